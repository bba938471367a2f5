//! In-memory tabular data.
//!
//! A [`Table`] is a rectangular dataset with named, kind-tagged columns. The
//! kind of every column is decided once, by the loader, at load time — nothing
//! downstream re-infers types. Row order is preserved as loaded but carries no
//! meaning for summarization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// The inferred kind of a column.
///
/// Columns whose values fit none of the first three kinds are tagged `Other`;
/// they still count toward the column total but are skipped by the
/// per-kind digest sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
    DateTime,
    Other,
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Number(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    /// An empty or unparseable-as-declared-kind cell.
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Render the cell as the raw text a user would recognize from the file.
    pub fn display(&self) -> String {
        match self {
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Cell::Text(s) => s.clone(),
            Cell::Timestamp(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            Cell::Missing => String::new(),
        }
    }
}

/// A named column holding one kind of value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Number of missing cells in this column.
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Iterate over non-missing cells.
    pub fn present(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| !c.is_missing())
    }
}

/// An in-memory rectangular dataset.
///
/// Invariant: a valid table has at least one row and one column. Validation
/// is the caller's responsibility — [`Table::validate`] is a distinct
/// operation and the summarizer assumes it has already passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Ordered column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Total missing-cell count across all columns, regardless of kind.
    pub fn missing_total(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// Check the table invariant: at least one row and one column.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        if self.row_count() == 0 {
            return Err(TableError::NoRows);
        }
        Ok(())
    }
}
