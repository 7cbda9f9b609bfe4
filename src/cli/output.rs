//! Rendering of command results in the selected output format

use serde::Serialize;
use serde_json::Value;
use std::io::Write;

use crate::api::Resource;
use crate::cli::helpers::flatten_json;
use crate::cli::table::{csv_string, CellValue, ColumnDef, TableError, TableFormatter, TableRow};
use crate::cli::OutputFormat;
use crate::core::error::CliError;

const PROPERTY_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("property", "PROPERTY", 32),
    ColumnDef::new("value", "VALUE", 60),
];

/// Render records (a slice, or a single record)
///
/// JSON and YAML carry the full records; every other format renders `rows`
/// over `columns`.
pub fn render_list<T: Serialize + ?Sized>(
    records: &T,
    rows: &[TableRow],
    columns: &[ColumnDef],
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => to_json(records),
        OutputFormat::Yaml => to_yaml(records),
        _ => Ok(TableFormatter::new(columns).render(rows, format)?),
    }
}

/// Render one untyped record as a property/value listing
pub fn render_record(
    record: &Value,
    resource: Resource,
    format: OutputFormat,
) -> Result<String, CliError> {
    if !record.is_object() {
        return Err(TableError::NotARecord {
            resource: resource.to_string(),
            found: record.to_string(),
        }
        .into());
    }

    let id = record.get("id").and_then(Value::as_str).unwrap_or_default();
    let flat = flatten_json(record);

    match format {
        OutputFormat::Json => to_json(record),
        OutputFormat::Yaml => to_yaml(record),
        OutputFormat::Id => Ok(id.to_string()),
        OutputFormat::Csv => {
            let header = flat.iter().map(|(k, _)| k.clone()).collect();
            let values = flat
                .iter()
                .map(|(_, v)| CellValue::from_json(v).format_csv())
                .collect();
            Ok(csv_string(vec![header, values])?)
        }
        OutputFormat::Table | OutputFormat::Md => {
            let rows: Vec<TableRow> = flat
                .into_iter()
                .map(|(key, value)| {
                    TableRow::new(id)
                        .cell("property", CellValue::Text(key))
                        .cell("value", CellValue::from_json(&value))
                })
                .collect();
            Ok(TableFormatter::new(PROPERTY_COLUMNS).render(&rows, format)?)
        }
    }
}

/// Write rendered output followed by a newline; empty output writes nothing
pub fn emit(out: &mut dyn Write, rendered: &str) -> Result<(), CliError> {
    if !rendered.is_empty() {
        writeln!(out, "{}", rendered)?;
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Upstream(format!("cannot encode JSON: {e}")))
}

fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_yml::to_string(&value)
        .map(|yaml| yaml.trim_end().to_string())
        .map_err(|e| CliError::Upstream(format!("cannot encode YAML: {e}")))
}
