//! Tabular output for list-style commands
//!
//! Rows are built as keyed cells and rendered as TSV, CSV, Markdown or a
//! boxed terminal table. Only the requested columns are emitted, in the order
//! of the command's column definitions.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::{format_delta, format_length, format_mean, format_score};
use crate::cli::OutputFormat;

/// A column a command can emit
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str) -> Self {
        Self { key, header }
    }
}

/// A typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    /// Damper length, three decimals
    Length(f64),
    /// Signed length change, three decimals
    Delta(f64),
    Rank(u32),
    /// Mean rank or mean length, two decimals
    Mean(f64),
    /// Weighted score; infinite scores print as `inf`
    Score(f64),
    Flag(bool),
    Empty,
}

impl CellValue {
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Length(v) => format_length(*v),
            CellValue::Delta(v) => format_delta(*v),
            CellValue::Rank(r) => r.to_string(),
            CellValue::Mean(v) => format_mean(*v),
            CellValue::Score(v) => format_score(*v),
            CellValue::Flag(true) => "yes".to_string(),
            CellValue::Flag(false) | CellValue::Empty => String::new(),
        }
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Rank(value)
    }
}

/// One output row keyed by column
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    cells: HashMap<&'static str, CellValue>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, key: &'static str, value: impl Into<CellValue>) -> Self {
        self.cells.insert(key, value.into());
        self
    }

    pub fn text(self, key: &'static str, value: impl Into<String>) -> Self {
        self.cell(key, CellValue::Text(value.into()))
    }

    fn get(&self, key: &str) -> String {
        self.cells.get(key).map(CellValue::render).unwrap_or_default()
    }
}

/// Renders rows for one set of column definitions
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    noun: &'static str,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], noun: &'static str) -> Self {
        Self { columns, noun }
    }

    fn visible(&self, keys: &[&str]) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|c| keys.is_empty() || keys.contains(&c.key))
            .collect()
    }

    /// Render rows; an empty `keys` selects every column
    pub fn render(&self, rows: &[TableRow], format: OutputFormat, keys: &[&str]) -> Result<String> {
        let columns = self.visible(keys);
        let headers: Vec<String> = columns.iter().map(|c| c.header.to_string()).collect();
        let records: Vec<Vec<String>> = rows
            .iter()
            .map(|row| columns.iter().map(|c| row.get(c.key)).collect())
            .collect();

        match format {
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.write_record(&headers).into_diagnostic()?;
                for record in &records {
                    writer.write_record(record).into_diagnostic()?;
                }
                let bytes = writer.into_inner().into_diagnostic()?;
                String::from_utf8(bytes).into_diagnostic()
            }
            OutputFormat::Md | OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(headers);
                for record in records {
                    builder.push_record(record);
                }
                let mut table = builder.build();
                if format == OutputFormat::Md {
                    table.with(Style::markdown());
                } else {
                    table.with(Style::rounded());
                }
                Ok(format!("{}\n", table))
            }
            _ => {
                let mut out = headers.join("\t");
                out.push('\n');
                for record in records {
                    out.push_str(&record.join("\t"));
                    out.push('\n');
                }
                Ok(out)
            }
        }
    }

    /// Print rows to stdout, with a row count under terminal tables
    pub fn output(&self, rows: &[TableRow], format: OutputFormat, keys: &[&str]) -> Result<()> {
        print!("{}", self.render(rows, format, keys)?);
        if format == OutputFormat::Table {
            println!(
                "{}",
                style(format!("{} {}(s)", rows.len(), self.noun)).dim()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("clip", "CLIP"),
        ColumnDef::new("length", "LENGTH"),
        ColumnDef::new("rank", "RANK"),
    ];

    fn rows() -> Vec<TableRow> {
        vec![
            TableRow::new()
                .text("clip", "F1, spare")
                .cell("length", CellValue::Length(10.5))
                .cell("rank", 1u32),
            TableRow::new().text("clip", "F2").cell("rank", None::<u32>),
        ]
    }

    #[test]
    fn test_tsv() {
        let out = TableFormatter::new(COLUMNS, "clip")
            .render(&rows(), OutputFormat::Tsv, &[])
            .unwrap();
        assert_eq!(out, "CLIP\tLENGTH\tRANK\nF1, spare\t10.500\t1\nF2\t\t\n");
    }

    #[test]
    fn test_csv_quotes_commas() {
        let out = TableFormatter::new(COLUMNS, "clip")
            .render(&rows(), OutputFormat::Csv, &["clip", "rank"])
            .unwrap();
        assert_eq!(out, "CLIP,RANK\n\"F1, spare\",1\nF2,\n");
    }

    #[test]
    fn test_markdown() {
        let out = TableFormatter::new(COLUMNS, "clip")
            .render(&rows(), OutputFormat::Md, &[])
            .unwrap();
        assert!(out.contains("| CLIP"));
        assert!(out.contains("10.500"));
        assert!(out.lines().nth(1).unwrap().contains("---"));
    }
}
