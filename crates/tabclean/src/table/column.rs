//! Named column of cells.

use super::cell::Cell;

/// A named, ordered sequence of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Cell values in row order.
    pub cells: Vec<Cell>,
}

impl Column {
    /// Create a column from already-built cells.
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Create a column from raw loader text; blank entries become missing.
    pub fn from_raw(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(name, values.iter().map(|v| Cell::from_raw(v)).collect())
    }

    /// Number of cells (rows).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over the non-missing cells.
    pub fn non_missing(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| !c.is_missing())
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Get a cell by row index.
    pub fn get(&self, row: usize) -> Option<&Cell> {
        self.cells.get(row)
    }
}
