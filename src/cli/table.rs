//! Table formatting for list and show commands
//!
//! Rows are built from typed [`CellValue`]s and rendered over a declared
//! column order. The same rows serve every tabular format:
//! - `table`: box-drawn grid for terminals
//! - `md`: markdown table
//! - `csv`: RFC 4180 with column keys as header
//! - `id`: one record ID per line

use chrono::{DateTime, Utc};
use serde_json::Value;
use tabled::{builder::Builder, settings::Style};
use thiserror::Error;

use crate::api::Amount;
use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;

/// Errors from rendering a record set
#[derive(Debug, Error)]
pub enum TableError {
    #[error("record '{row}' has no value for column '{column}'")]
    MissingColumn { row: String, column: &'static str },

    #[error("expected a JSON object for a {resource} record, got: {found}")]
    NotARecord { resource: String, found: String },

    #[error("{0:?} output is not tabular")]
    NotTabular(OutputFormat),

    #[error("CSV output failed: {0}")]
    Csv(String),
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Resource ID, never truncated
    Id(String),
    /// Plain text, truncated to the column width in tables
    Text(String),
    /// Money, shown as "10.00 EUR"
    Amount(Amount),
    /// Timestamp, shown in UTC
    DateTime(DateTime<Utc>),
    Number(i64),
    Bool(bool),
    /// Missing/null value
    Empty,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Best-effort typing of an untyped API field
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map_or_else(|| CellValue::Text(n.to_string()), CellValue::Number),
            Value::String(s) => match DateTime::parse_from_rfc3339(s) {
                Ok(dt) => CellValue::DateTime(dt.with_timezone(&Utc)),
                Err(_) => CellValue::Text(s.clone()),
            },
            Value::Object(map) => match (map.get("value"), map.get("currency")) {
                (Some(Value::String(v)), Some(Value::String(c))) => {
                    CellValue::Amount(Amount::new(v.clone(), c.clone()))
                }
                _ => CellValue::Text(value.to_string()),
            },
            Value::Array(_) => CellValue::Text(value.to_string()),
        }
    }

    /// Format for table and markdown output
    pub fn format_table(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => id.clone(),
            CellValue::Text(s) => truncate_str(s, width),
            CellValue::Amount(amount) => amount.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(true) => "yes".to_string(),
            CellValue::Bool(false) => "no".to_string(),
            CellValue::Empty => "-".to_string(),
        }
    }

    /// Format for CSV output (full values, no placeholders)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Id(id) => id.clone(),
            CellValue::Text(s) => s.clone(),
            CellValue::Amount(amount) => amount.to_string(),
            CellValue::DateTime(dt) => dt.to_rfc3339(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

/// Column definition with key, header label and maximum table width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
    /// Holds amounts; CSV splits it into `<key>_value` and `<key>_currency`
    pub money: bool,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self {
            key,
            header,
            width,
            money: false,
        }
    }

    pub const fn amount(key: &'static str, header: &'static str, width: usize) -> Self {
        Self {
            money: true,
            ..Self::new(key, header, width)
        }
    }
}

/// A row of cell values for table output
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Build a row from an untyped record, one cell per column
    ///
    /// Fields the API omitted become empty cells.
    pub fn from_json(
        record: &Value,
        columns: &[ColumnDef],
        resource: &str,
    ) -> Result<Self, TableError> {
        let Value::Object(map) = record else {
            return Err(TableError::NotARecord {
                resource: resource.to_string(),
                found: truncate_str(&record.to_string(), 40),
            });
        };

        let id = map.get("id").and_then(Value::as_str).unwrap_or_default();
        let row = columns.iter().fold(TableRow::new(id), |row, col| {
            let value = match map.get(col.key) {
                Some(Value::String(s)) if col.key == "id" => CellValue::Id(s.clone()),
                Some(v) => CellValue::from_json(v),
                None => CellValue::Empty,
            };
            row.cell(col.key, value)
        });
        Ok(row)
    }
}

/// Table formatter that outputs rows in the tabular formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef]) -> Self {
        Self { columns }
    }

    /// Render rows; the result has no trailing newline
    ///
    /// An empty row set yields just the header (nothing for `id`).
    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> Result<String, TableError> {
        match format {
            OutputFormat::Table => self.render_grid(rows, false),
            OutputFormat::Md => self.render_grid(rows, true),
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Id => Ok(rows
                .iter()
                .map(|r| r.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json | OutputFormat::Yaml => Err(TableError::NotTabular(format)),
        }
    }

    /// Cells of one row in column order
    fn cells<'r>(&self, row: &'r TableRow) -> Result<Vec<&'r CellValue>, TableError> {
        self.columns
            .iter()
            .map(|col| {
                row.get(col.key).ok_or_else(|| TableError::MissingColumn {
                    row: row.id.clone(),
                    column: col.key,
                })
            })
            .collect()
    }

    fn render_grid(&self, rows: &[TableRow], markdown: bool) -> Result<String, TableError> {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header));

        for row in rows {
            let cells = self.cells(row)?;
            builder.push_record(
                self.columns
                    .iter()
                    .zip(cells)
                    .map(|(col, cell)| cell.format_table(col.width)),
            );
        }

        let mut table = builder.build();
        if markdown {
            table.with(Style::markdown());
        } else {
            table.with(Style::modern());
        }
        Ok(table.to_string())
    }

    fn render_csv(&self, rows: &[TableRow]) -> Result<String, TableError> {
        let header = self
            .columns
            .iter()
            .flat_map(|col| {
                if col.money {
                    vec![format!("{}_value", col.key), format!("{}_currency", col.key)]
                } else {
                    vec![col.key.to_string()]
                }
            })
            .collect();

        let mut records: Vec<Vec<String>> = vec![header];
        for row in rows {
            let fields = self
                .columns
                .iter()
                .zip(self.cells(row)?)
                .flat_map(|(col, cell)| match (col.money, cell) {
                    (true, CellValue::Amount(amount)) => {
                        vec![amount.value.clone(), amount.currency.clone()]
                    }
                    (true, other) => vec![other.format_csv(), String::new()],
                    (false, other) => vec![other.format_csv()],
                })
                .collect();
            records.push(fields);
        }
        csv_string(records)
    }
}

/// Write records as CSV; the result has no trailing newline
pub(crate) fn csv_string(records: Vec<Vec<String>>) -> Result<String, TableError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for record in &records {
        writer
            .write_record(record)
            .map_err(|e| TableError::Csv(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TableError::Csv(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| TableError::Csv(e.to_string()))?;
    Ok(text.trim_end_matches('\n').to_string())
}
