//! Per-column summaries of a cleaned table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::inference::InferenceResult;
use crate::table::{Cell, Column, ColumnType};

/// Maximum distinct values for which top values are reported.
pub const TOP_VALUES_CARDINALITY: usize = 20;

/// Number of top values reported.
pub const TOP_VALUES_LIMIT: usize = 10;

/// Descriptive statistics for numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); zero for a single value.
    pub std: f64,
    pub min: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    pub median: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Describe a set of values; `None` when there are none.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            0.0
        } else {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        };

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }

    /// Calculate the interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Linear-interpolated quantile of sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Column name.
    pub name: String,
    /// Inferred type.
    pub column_type: ColumnType,
    /// Total number of cells.
    pub count: usize,
    /// Number of missing cells.
    pub missing: usize,
    /// Number of distinct non-missing values.
    pub unique: usize,
    /// Most frequent values, for low-cardinality columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_values: Option<Vec<(String, usize)>>,
    /// Numeric description, for integer and float columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
}

impl ColumnSummary {
    /// Summarize a column given its inferred type.
    pub fn compute(column: &Column, column_type: ColumnType) -> Self {
        let mut value_counts: IndexMap<String, usize> = IndexMap::new();
        for cell in column.non_missing() {
            if let Some(text) = cell.render() {
                *value_counts.entry(text).or_insert(0) += 1;
            }
        }
        let unique = value_counts.len();

        let top_values = if unique <= TOP_VALUES_CARDINALITY {
            let mut counts: Vec<(String, usize)> = value_counts.into_iter().collect();
            // Stable sort keeps first-seen order among equal counts
            counts.sort_by(|a, b| b.1.cmp(&a.1));
            counts.truncate(TOP_VALUES_LIMIT);
            Some(counts)
        } else {
            None
        };

        let numeric = if column_type.is_numeric() {
            let values: Vec<f64> = column
                .cells
                .iter()
                .filter_map(|cell| match cell {
                    Cell::Integer(v) => Some(*v as f64),
                    Cell::Float(v) if v.is_finite() => Some(*v),
                    _ => None,
                })
                .collect();
            NumericSummary::compute(&values)
        } else {
            None
        };

        Self {
            name: column.name.clone(),
            column_type,
            count: column.len(),
            missing: column.missing_count(),
            unique,
            top_values,
            numeric,
        }
    }

    /// Get the missing percentage.
    pub fn missing_percentage(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.missing as f64 / self.count as f64) * 100.0
        }
    }
}

/// Summaries for every column of an inference result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

impl TableSummary {
    /// Summarize every column, in order.
    pub fn compute(result: &InferenceResult) -> Self {
        let columns = result
            .table
            .columns()
            .iter()
            .map(|column| {
                let column_type = result
                    .column_type(&column.name)
                    .unwrap_or(ColumnType::String);
                ColumnSummary::compute(column, column_type)
            })
            .collect();

        Self {
            rows: result.table.row_count(),
            columns,
        }
    }

    /// Get a column summary by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}
