//! Inferred type tags.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// Inferred type for a column.
///
/// A column is homogeneous after inference: every non-missing cell has the
/// representation named by its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Every cell is missing.
    Empty,
    /// Calendar date and/or time values.
    DateTime,
    /// Whole numbers, stored as nullable 64-bit integers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Free text.
    String,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Returns true if this type is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::DateTime)
    }

    /// Lowercase tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Empty => "empty",
            ColumnType::DateTime => "datetime",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
        }
    }

    /// Check whether a cell conforms to this type. Missing cells conform to
    /// every type.
    pub fn accepts(&self, cell: &Cell) -> bool {
        match (self, cell) {
            (_, cell) if cell.is_missing() => true,
            (ColumnType::DateTime, Cell::DateTime(_)) => true,
            (ColumnType::Integer, Cell::Integer(_)) => true,
            (ColumnType::Float, Cell::Float(v)) => v.is_finite(),
            (ColumnType::String, Cell::Text(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
