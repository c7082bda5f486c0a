//! Scalar cell values.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};

/// A single table cell: a scalar value or the missing marker.
///
/// Missing is distinct from an empty string and from zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Text(String),
    Integer(i64),
    Float(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Build a cell from raw loader text. Blank or whitespace-only input is
    /// treated as an empty spreadsheet cell, i.e. missing.
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Missing
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// Check if this cell is missing. A NaN float counts as missing, the
    /// way it marks an absent value in a numeric spreadsheet column.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Borrow the text of a `Text` cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text form of the value, or `None` for missing cells.
    pub fn render(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Float(v) if v.is_nan() => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Integer(v) => Some(v.to_string()),
            Cell::Float(v) => Some(format_float(*v)),
            Cell::DateTime(dt) => Some(format_datetime(dt)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(s) => f.write_str(&s),
            None => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::DateTime(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Missing)
    }
}

/// Format a float so that whole values keep a decimal point (`2.0`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Format a datetime as `YYYY-MM-DD HH:MM:SS`, with fractional seconds only
/// when present.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    if value.nanosecond() == 0 {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}
