//! Column type inference.
//!
//! Each column is classified independently:
//!
//! 1. a column with no non-missing cells is `empty` and passes through;
//! 2. every non-missing cell is tried as a number and as a date/time;
//! 3. `datetime` wins when its parse ratio clears `datetime_threshold` and
//!    is strictly greater than the numeric ratio;
//! 4. otherwise the column is numeric when the numeric ratio clears
//!    `numeric_threshold` (`integer` if every parsed number is integral,
//!    else `float`);
//! 5. otherwise it is `string`.
//!
//! Cells that fail to parse under the chosen type become missing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TabcleanError};
use crate::table::{Cell, Column, ColumnType, Table};

use super::coerce::{parse_datetime, parse_number, Number};

/// Literal renderings of missing markers produced by other tools.
const MISSING_LITERALS: &[&str] = &["nan", "None"];

/// Confidence thresholds for accepting a candidate type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Minimum share of non-missing cells that must parse as date/time.
    pub datetime_threshold: f64,
    /// Minimum share of non-missing cells that must parse as numbers.
    pub numeric_threshold: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            datetime_threshold: 0.6,
            numeric_threshold: 0.8,
        }
    }
}

impl InferenceConfig {
    /// Create a configuration with explicit thresholds.
    pub fn new(datetime_threshold: f64, numeric_threshold: f64) -> Self {
        Self {
            datetime_threshold,
            numeric_threshold,
        }
    }

    /// Check that both thresholds lie in (0, 1].
    pub fn validate(&self) -> Result<()> {
        check_threshold("datetime_threshold", self.datetime_threshold)?;
        check_threshold("numeric_threshold", self.numeric_threshold)
    }
}

fn check_threshold(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(TabcleanError::Config(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )))
    }
}

/// Diagnostics for one column's decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    /// Column name.
    pub name: String,
    /// Decided type.
    pub column_type: ColumnType,
    /// Number of non-missing input cells.
    pub non_missing: usize,
    /// Share of non-missing cells that parsed as numbers.
    pub numeric_ratio: f64,
    /// Share of non-missing cells that parsed as date/time.
    pub datetime_ratio: f64,
    /// Non-missing input cells that became missing in the output.
    pub coerced_to_missing: usize,
}

/// Output of inference over a table.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    /// Table with every column cast to its inferred type.
    pub table: Table,
    /// Inferred type per column, in column order.
    pub types: IndexMap<String, ColumnType>,
    /// Per-column diagnostics, in column order.
    pub reports: Vec<ColumnReport>,
}

impl InferenceResult {
    /// Get the inferred type of a column.
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.types.get(name).copied()
    }
}

/// Stateless type inference engine.
#[derive(Debug, Clone, Default)]
pub struct TypeInference {
    config: InferenceConfig,
}

impl TypeInference {
    /// Create an engine with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom thresholds.
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// The thresholds in use.
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer and cast every column of `table`.
    ///
    /// Fails only on an invalid configuration, before any column is touched.
    pub fn infer(&self, table: &Table) -> Result<InferenceResult> {
        self.config.validate()?;

        let mut columns = Vec::with_capacity(table.column_count());
        let mut types = IndexMap::with_capacity(table.column_count());
        let mut reports = Vec::with_capacity(table.column_count());

        for column in table.columns() {
            let (cast, report) = self.infer_column(column);
            types.insert(column.name.clone(), report.column_type);
            reports.push(report);
            columns.push(cast);
        }

        info!(
            columns = columns.len(),
            rows = table.row_count(),
            "inferred column types"
        );

        // Names and lengths are copied from a valid table.
        let table = Table::new(columns)?;

        Ok(InferenceResult {
            table,
            types,
            reports,
        })
    }

    /// Classify one column and return it cast to the chosen type.
    pub fn infer_column(&self, column: &Column) -> (Column, ColumnReport) {
        let mut non_missing = 0usize;
        let mut numeric_ok = 0usize;
        let mut datetime_ok = 0usize;
        let mut all_integral = true;

        for cell in column.non_missing() {
            non_missing += 1;
            if let Some(number) = parse_number(cell) {
                numeric_ok += 1;
                all_integral &= number.is_integral();
            }
            if parse_datetime(cell).is_some() {
                datetime_ok += 1;
            }
        }

        if non_missing == 0 {
            let report = ColumnReport {
                name: column.name.clone(),
                column_type: ColumnType::Empty,
                non_missing: 0,
                numeric_ratio: 0.0,
                datetime_ratio: 0.0,
                coerced_to_missing: 0,
            };
            debug!(column = %column.name, "all values missing, tagged empty");
            return (column.clone(), report);
        }

        let numeric_ratio = numeric_ok as f64 / non_missing as f64;
        let datetime_ratio = datetime_ok as f64 / non_missing as f64;

        let (column_type, cells) = if datetime_ratio >= self.config.datetime_threshold
            && datetime_ratio > numeric_ratio
        {
            (ColumnType::DateTime, cast_datetime(&column.cells))
        } else if numeric_ratio >= self.config.numeric_threshold {
            if all_integral {
                (ColumnType::Integer, cast_integer(&column.cells))
            } else {
                (ColumnType::Float, cast_float(&column.cells))
            }
        } else {
            (ColumnType::String, cast_string(&column.cells))
        };

        let output_missing = cells.iter().filter(|c| c.is_missing()).count();
        let input_missing = column.len() - non_missing;
        let report = ColumnReport {
            name: column.name.clone(),
            column_type,
            non_missing,
            numeric_ratio,
            datetime_ratio,
            coerced_to_missing: output_missing - input_missing,
        };

        debug!(
            column = %column.name,
            %column_type,
            numeric_ratio,
            datetime_ratio,
            coerced = report.coerced_to_missing,
            "column classified"
        );

        (Column::new(column.name.clone(), cells), report)
    }
}

fn cast_datetime(cells: &[Cell]) -> Vec<Cell> {
    cells
        .iter()
        .map(|cell| parse_datetime(cell).map(Cell::DateTime).unwrap_or(Cell::Missing))
        .collect()
}

fn cast_integer(cells: &[Cell]) -> Vec<Cell> {
    cells
        .iter()
        .map(|cell| {
            parse_number(cell)
                .and_then(|n| n.to_i64())
                .map(Cell::Integer)
                .unwrap_or(Cell::Missing)
        })
        .collect()
}

fn cast_float(cells: &[Cell]) -> Vec<Cell> {
    cells
        .iter()
        .map(|cell| {
            parse_number(cell)
                .map(|n: Number| Cell::Float(n.to_f64()))
                .unwrap_or(Cell::Missing)
        })
        .collect()
}

fn cast_string(cells: &[Cell]) -> Vec<Cell> {
    cells
        .iter()
        .map(|cell| match cell.render() {
            Some(text) => {
                let trimmed = text.trim();
                if MISSING_LITERALS.contains(&trimmed) {
                    Cell::Missing
                } else {
                    Cell::Text(trimmed.to_string())
                }
            }
            None => Cell::Missing,
        })
        .collect()
}

/// Infer column types with explicit thresholds.
pub fn infer(
    table: &Table,
    datetime_threshold: f64,
    numeric_threshold: f64,
) -> Result<InferenceResult> {
    TypeInference::with_config(InferenceConfig::new(datetime_threshold, numeric_threshold))
        .infer(table)
}
