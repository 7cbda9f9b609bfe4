//! `mollie list` and `mollie get` - generic access to any API resource
//!
//! Resources are named by any unambiguous part of their name (`pay` for
//! payments, `link` for payment-links). `get` infers the resource from the
//! ID prefix unless `--hint-resource` names it.

use std::io::Write;

use super::PageArgs;
use crate::api::{check_id, PaymentsClient, Resource, ResourceError};
use crate::cli::output::{emit, render_list, render_record};
use crate::cli::table::{ColumnDef, TableRow};
use crate::cli::OutputFormat;
use crate::core::error::CliError;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Resource name, or an unambiguous part of it (e.g. "pay")
    pub resource: String,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Resource ID (e.g. tr_7UhSN1zuXS)
    pub id: String,

    /// Resource to look in, when the ID prefix is not enough
    #[arg(long, short = 'r')]
    pub hint_resource: Option<String>,
}

const ID: ColumnDef = ColumnDef::new("id", "ID", 24);
const AMOUNT: ColumnDef = ColumnDef::amount("amount", "AMOUNT", 16);
const STATUS: ColumnDef = ColumnDef::new("status", "STATUS", 12);
const PAID_AT: ColumnDef = ColumnDef::new("paidAt", "PAID AT", 19);
const DESCRIPTION: ColumnDef = ColumnDef::new("description", "DESCRIPTION", 40);
const EMAIL: ColumnDef = ColumnDef::new("email", "EMAIL", 32);
const NAME: ColumnDef = ColumnDef::new("name", "NAME", 30);
const REFERENCE: ColumnDef = ColumnDef::new("reference", "REFERENCE", 20);
const PAYMENT_ID: ColumnDef = ColumnDef::new("paymentId", "PAYMENT", 24);

/// Columns shown when listing a resource
pub fn list_columns(resource: Resource) -> &'static [ColumnDef] {
    match resource {
        Resource::Payments | Resource::Orders => &[ID, AMOUNT, STATUS, PAID_AT],
        Resource::Customers => &[ID, EMAIL],
        Resource::Profiles => &[ID, NAME, EMAIL, STATUS],
        Resource::Refunds => &[ID, AMOUNT, STATUS, DESCRIPTION],
        Resource::Settlements => &[ID, REFERENCE, AMOUNT, STATUS],
        Resource::Chargebacks => &[ID, AMOUNT, PAYMENT_ID],
        Resource::PaymentLinks => &[ID, AMOUNT, DESCRIPTION],
        Resource::Methods => &[ID, DESCRIPTION],
        Resource::Invoices | Resource::Subscriptions => &[ID],
    }
}

pub fn run_list(
    args: ListArgs,
    client: &dyn PaymentsClient,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let resource = Resource::find(&args.resource)?;
    let page = args.page.page()?;
    log::debug!("listing {resource}");

    let records = client.list_resource(resource, &page)?;
    let columns = list_columns(resource);
    let rows = records
        .iter()
        .map(|record| TableRow::from_json(record, columns, resource.name()))
        .collect::<Result<Vec<_>, _>>()?;

    emit(out, &render_list(&records[..], &rows, columns, format)?)
}

pub fn run_get(
    args: GetArgs,
    client: &dyn PaymentsClient,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let resource = match &args.hint_resource {
        Some(hint) => Resource::find(hint)?,
        None => Resource::from_id(&args.id)?,
    };
    if !resource.supports_get() {
        return Err(ResourceError::Unsupported {
            resource,
            operation: "getting single objects",
        }
        .into());
    }
    check_id(&args.id, resource.id_prefix())?;

    let record = client.get_resource(resource, &args.id)?;
    emit(out, &render_record(&record, resource, format)?)
}
