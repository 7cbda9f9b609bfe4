//! `mollie methods` command - Payment methods enabled on the profile

use clap::Subcommand;
use std::io::Write;

use crate::api::{Amount, Method, MethodFilter, PaymentsClient};
use crate::cli::output::{emit, render_list};
use crate::cli::table::{CellValue, ColumnDef, TableRow};
use crate::cli::OutputFormat;
use crate::core::error::CliError;

#[derive(Subcommand, Debug)]
pub enum MethodsCommands {
    /// List enabled payment methods
    List(MethodsListArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct MethodsListArgs {
    /// Only methods that support this amount, e.g. 10.00 (needs --currency)
    #[arg(long, requires = "currency")]
    pub amount: Option<String>,

    /// ISO 4217 currency of --amount, e.g. EUR
    #[arg(long, requires = "amount")]
    pub currency: Option<String>,

    /// Locale for method descriptions, e.g. nl_NL
    #[arg(long)]
    pub locale: Option<String>,
}

const METHOD_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("description", "DESCRIPTION", 30),
    ColumnDef::amount("minimum", "MINIMUM", 16),
    ColumnDef::amount("maximum", "MAXIMUM", 16),
];

pub fn run(
    cmd: MethodsCommands,
    client: &dyn PaymentsClient,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match cmd {
        MethodsCommands::List(args) => run_list(args, client, format, out),
    }
}

fn run_list(
    args: MethodsListArgs,
    client: &dyn PaymentsClient,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let filter = args.filter()?;
    let methods = client.list_methods(&filter)?;

    let rows: Vec<TableRow> = methods.iter().map(method_row).collect();
    emit(out, &render_list(&methods[..], &rows, METHOD_COLUMNS, format)?)
}

impl MethodsListArgs {
    fn filter(&self) -> Result<MethodFilter, CliError> {
        let amount = match (&self.amount, &self.currency) {
            (Some(value), Some(currency)) => {
                Some(Amount::new(parse_value(value)?, parse_currency(currency)?))
            }
            (None, None) => None,
            _ => {
                return Err(CliError::validation(
                    "--amount and --currency must be given together",
                ))
            }
        };

        let locale = match self.locale.as_deref().map(str::trim) {
            Some(locale) if !is_locale(locale) => {
                return Err(CliError::validation(format!(
                    "'{locale}' is not a locale, expected e.g. en_US"
                )))
            }
            other => other.map(str::to_string),
        };

        Ok(MethodFilter { amount, locale })
    }
}

/// Normalize a decimal amount to two fraction digits ("10" -> "10.00")
fn parse_value(value: &str) -> Result<String, CliError> {
    let invalid = || CliError::validation(format!("'{value}' is not an amount, expected e.g. 10.00"));

    let (whole, fraction) = value.trim().split_once('.').unwrap_or((value.trim(), ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) || fraction.len() > 2 {
        return Err(invalid());
    }
    Ok(format!("{whole}.{fraction:0<2}"))
}

fn parse_currency(currency: &str) -> Result<String, CliError> {
    let currency = currency.trim();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CliError::validation(format!(
            "'{currency}' is not a currency code, expected e.g. EUR"
        )));
    }
    Ok(currency.to_ascii_uppercase())
}

fn is_locale(locale: &str) -> bool {
    match locale.split_once('_') {
        Some((lang, region)) => {
            lang.len() == 2
                && region.len() == 2
                && lang.chars().all(|c| c.is_ascii_lowercase())
                && region.chars().all(|c| c.is_ascii_uppercase())
        }
        None => false,
    }
}

fn method_row(method: &Method) -> TableRow {
    let amount_cell = |amount: &Option<Amount>| {
        amount
            .as_ref()
            .map_or(CellValue::Empty, |a| CellValue::Amount(a.clone()))
    };

    TableRow::new(&method.id)
        .cell("id", CellValue::Id(method.id.clone()))
        .cell("description", CellValue::text(&method.description))
        .cell("minimum", amount_cell(&method.minimum_amount))
        .cell("maximum", amount_cell(&method.maximum_amount))
}
