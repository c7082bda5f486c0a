//! Row trimming, header promotion and column selection applied before
//! inference.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TabcleanError};
use crate::table::{unique_headers, Column, Table};

/// Reshape steps, applied in field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReshapeOptions {
    /// Number of leading rows to drop.
    #[serde(default)]
    pub skip_rows: usize,
    /// Use the first remaining row as column names.
    #[serde(default)]
    pub header_from_first_row: bool,
    /// Columns to keep, in output order (None = all).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

impl ReshapeOptions {
    /// Options that leave the table unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the first `n` rows.
    pub fn skip_rows(mut self, n: usize) -> Self {
        self.skip_rows = n;
        self
    }

    /// Promote the first remaining row to the header.
    pub fn header_from_first_row(mut self, enabled: bool) -> Self {
        self.header_from_first_row = enabled;
        self
    }

    /// Keep only the named columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Human-readable list of the steps these options perform.
    pub fn describe(&self) -> Vec<String> {
        let mut steps = Vec::new();
        if self.skip_rows > 0 {
            steps.push(format!("Remove top {} rows", self.skip_rows));
        }
        if self.header_from_first_row {
            steps.push("Use first row as column headers".to_string());
        }
        if let Some(ref columns) = self.columns {
            steps.push(format!("Keep columns: {}", columns.join(", ")));
        }
        steps
    }
}

/// Apply all configured steps to a copy of `table`.
pub fn reshape(table: &Table, options: &ReshapeOptions) -> Result<Table> {
    let mut current = skip_rows(table, options.skip_rows)?;

    if options.header_from_first_row {
        current = promote_header(&current)?;
    }

    if let Some(ref names) = options.columns {
        current = select_columns(&current, names)?;
    }

    debug!(
        rows = current.row_count(),
        columns = current.column_count(),
        "reshaped table"
    );

    Ok(current)
}

/// Drop the first `n` rows. `n` may equal the row count.
pub fn skip_rows(table: &Table, n: usize) -> Result<Table> {
    let rows = table.row_count();
    if n > rows {
        return Err(TabcleanError::InvalidSelection(format!(
            "cannot remove {} rows from a table with {} rows",
            n, rows
        )));
    }
    Ok(table.slice_rows(n, rows - n))
}

/// Use the first row as column names and drop it from the data.
pub fn promote_header(table: &Table) -> Result<Table> {
    let first = table.row(0).ok_or_else(|| {
        TabcleanError::InvalidSelection("no row left to use as header".to_string())
    })?;

    let headers = unique_headers(first.into_iter().map(|cell| cell.render()).collect());
    let rows = table.row_count();

    let columns = table
        .columns()
        .iter()
        .zip(headers)
        .map(|(column, name)| Column::new(name, column.cells[1..rows].to_vec()))
        .collect();

    Table::new(columns)
}

/// Keep only the named columns, in the given order.
pub fn select_columns(table: &Table, names: &[String]) -> Result<Table> {
    let mut columns = Vec::with_capacity(names.len());

    for name in names {
        if columns.iter().any(|c: &Column| &c.name == name) {
            return Err(TabcleanError::InvalidSelection(format!(
                "column '{}' selected more than once",
                name
            )));
        }
        let column = table.column(name).ok_or_else(|| {
            TabcleanError::InvalidSelection(format!("unknown column '{}'", name))
        })?;
        columns.push(column.clone());
    }

    Table::new(columns)
}
