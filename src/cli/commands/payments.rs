//! `mollie payments` command - Payment lookup

use clap::Subcommand;
use std::io::Write;

use super::PageArgs;
use crate::api::{check_id, Payment, PaymentsClient, Refund, Resource};
use crate::cli::output::{emit, render_list};
use crate::cli::table::{CellValue, ColumnDef, TableRow};
use crate::cli::OutputFormat;
use crate::core::error::CliError;

#[derive(Subcommand, Debug)]
pub enum PaymentsCommands {
    /// List payments, newest first
    List(PageArgs),

    /// Show a single payment
    Show(ShowArgs),

    /// List the refunds of a payment
    Refunds(RefundsArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Payment ID (tr_...)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct RefundsArgs {
    /// Payment ID (tr_...)
    pub id: String,

    #[command(flatten)]
    pub page: PageArgs,
}

/// Payment columns, in display order
pub const PAYMENT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 24),
    ColumnDef::new("amount", "AMOUNT", 14),
    ColumnDef::new("currency", "CURRENCY", 8),
    ColumnDef::new("status", "STATUS", 10),
    ColumnDef::new("description", "DESCRIPTION", 40),
    ColumnDef::new("created", "CREATED", 19),
];

const REFUND_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 24),
    ColumnDef::new("amount", "AMOUNT", 14),
    ColumnDef::new("currency", "CURRENCY", 8),
    ColumnDef::new("status", "STATUS", 10),
    ColumnDef::new("description", "DESCRIPTION", 40),
    ColumnDef::new("payment", "PAYMENT", 24),
];

/// Run a payments subcommand
pub fn run(
    cmd: PaymentsCommands,
    client: &dyn PaymentsClient,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match cmd {
        PaymentsCommands::List(args) => run_list(args, client, format, out),
        PaymentsCommands::Show(args) => run_show(args, client, format, out),
        PaymentsCommands::Refunds(args) => run_refunds(args, client, format, out),
    }
}

fn run_list(
    args: PageArgs,
    client: &dyn PaymentsClient,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let page = args.page()?;
    let payments = client.list_payments(&page)?;
    log::debug!("{} payment(s) returned", payments.len());

    let rows: Vec<TableRow> = payments.iter().map(payment_row).collect();
    emit(out, &render_list(&payments[..], &rows, PAYMENT_COLUMNS, format)?)
}

fn run_show(
    args: ShowArgs,
    client: &dyn PaymentsClient,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    check_id(&args.id, Resource::Payments.id_prefix())?;
    let payment = client.get_payment(&args.id)?;

    let rows = [payment_row(&payment)];
    emit(out, &render_list(&payment, &rows, PAYMENT_COLUMNS, format)?)
}

fn run_refunds(
    args: RefundsArgs,
    client: &dyn PaymentsClient,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    check_id(&args.id, Resource::Payments.id_prefix())?;
    let page = args.page.page()?;
    let refunds = client.list_payment_refunds(&args.id, &page)?;

    let rows: Vec<TableRow> = refunds.iter().map(refund_row).collect();
    emit(out, &render_list(&refunds[..], &rows, REFUND_COLUMNS, format)?)
}

pub fn payment_row(payment: &Payment) -> TableRow {
    TableRow::new(&payment.id)
        .cell("id", CellValue::Id(payment.id.clone()))
        .cell("amount", CellValue::text(&payment.amount.value))
        .cell("currency", CellValue::text(&payment.amount.currency))
        .cell("status", CellValue::text(payment.status.to_string()))
        .cell("description", CellValue::text(&payment.description))
        .cell("created", CellValue::DateTime(payment.created_at))
}

fn refund_row(refund: &Refund) -> TableRow {
    TableRow::new(&refund.id)
        .cell("id", CellValue::Id(refund.id.clone()))
        .cell("amount", CellValue::text(&refund.amount.value))
        .cell("currency", CellValue::text(&refund.amount.currency))
        .cell("status", CellValue::text(&refund.status))
        .cell("description", CellValue::text(&refund.description))
        .cell("payment", CellValue::Id(refund.payment_id.clone()))
}
