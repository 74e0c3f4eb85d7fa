//! Tabular payloads with CSV serialization.

use std::fmt;
use std::path::Path;

use serde_json::{json, Value};

use super::{ObjectAdapter, ObjectError};

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum TableValue {
    /// Floating point cell.
    Float(f64),
    /// Integer cell.
    Int(i64),
    /// Text cell.
    Text(String),
}

impl fmt::Display for TableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableValue::Float(v) => write!(f, "{v}"),
            TableValue::Int(v) => write!(f, "{v}"),
            TableValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<f64> for TableValue {
    fn from(v: f64) -> Self {
        TableValue::Float(v)
    }
}

impl From<i64> for TableValue {
    fn from(v: i64) -> Self {
        TableValue::Int(v)
    }
}

impl From<&str> for TableValue {
    fn from(v: &str) -> Self {
        TableValue::Text(v.to_string())
    }
}

/// A named table: a header row plus data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name, used as the export name when settings give none.
    pub name: String,
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Data rows; each row must match the header width.
    pub rows: Vec<Vec<TableValue>>,
}

impl Table {
    /// Build a table, checking every row against the header width.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<TableValue>>,
    ) -> Result<Self, ObjectError> {
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(ObjectError::RaggedRow {
                    row: index,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Table {
            name: name.into(),
            columns,
            rows,
        })
    }

    /// Number of data rows.
    pub fn size(&self) -> usize {
        self.rows.len()
    }
}

impl ObjectAdapter for Table {
    fn classname(&self) -> &str {
        "table"
    }

    fn efolder(&self) -> &str {
        "tables"
    }

    fn extension(&self) -> &str {
        ".csv"
    }

    fn format(&self) -> &str {
        "csv"
    }

    fn layout(&self) -> Option<&str> {
        Some("table")
    }

    fn name_hint(&self) -> Option<&str> {
        (!self.name.is_empty()).then_some(self.name.as_str())
    }

    fn spec(&self) -> Option<Value> {
        Some(json!({
            "columns": self.columns,
            "size": self.size(),
        }))
    }

    fn write_to(&self, path: &Path) -> Result<(), ObjectError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}
