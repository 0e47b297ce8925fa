//! Raw survey sheets
//!
//! A sheet is a header row plus string cells, exactly as ingested. Numeric
//! interpretation happens during record resolution.

use std::collections::HashMap;

/// A raw survey sheet
#[derive(Debug, Clone, Default)]
pub struct SurveyTable {
    /// Sheet label used in diagnostics (file name, "front", "rear", ...)
    pub name: String,
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl SurveyTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            name: name.into(),
            columns,
            index,
            rows: Vec::new(),
        }
    }

    /// Append a row; short rows are padded with empty cells
    pub fn push_row(&mut self, mut row: Vec<String>) {
        if row.len() < self.columns.len() {
            row.resize(self.columns.len(), String::new());
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a cell as a number; empty or non-numeric cells read as NaN
pub fn parse_number(cell: &str) -> f64 {
    cell.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_lookup() {
        let table = SurveyTable::new("front", vec!["Center".into(), "Clip".into()]);
        assert!(table.has_column("Clip"));
        assert!(!table.has_column("clip"));
        assert_eq!(table.column_index("Center"), Some(0));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = SurveyTable::new("sheet", vec!["A".into(), "B".into(), "C".into()]);
        table.push_row(vec!["1".into()]);
        assert_eq!(table.rows()[0], vec!["1", "", ""]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 12.5 "), 12.5);
        assert!(parse_number("").is_nan());
        assert!(parse_number("n/a").is_nan());
    }
}
