//! tabclean: column type inference and cleanup for tabular datasets.
//!
//! Spreadsheet exports arrive with every cell as text. tabclean decides,
//! column by column, whether the data is really dates, whole numbers,
//! decimals or free text, casts the cells accordingly and turns anything
//! that does not fit into a missing value.
//!
//! # Core Principles
//!
//! - **Non-destructive**: the input table is never modified
//! - **Deterministic**: the same input and thresholds give the same output
//! - **Idempotent**: cleaning a cleaned table changes nothing
//!
//! # Features
//!
//! - `parquet`: Parquet export through Arrow.
//! - `excel`: read the first sheet of `.xlsx` files and export to `.xlsx`.
//!
//! # Example
//!
//! ```no_run
//! use tabclean::{Cleaner, ExportFormat, Exporter};
//!
//! let cleaner = Cleaner::new();
//! let cleaned = cleaner.clean_file("survey.csv").unwrap();
//!
//! for (name, column_type) in &cleaned.result.types {
//!     println!("{}: {}", name, column_type);
//! }
//!
//! Exporter::new(ExportFormat::Csv)
//!     .write_file(cleaned.table(), "survey_cleaned.csv")
//!     .unwrap();
//! ```

pub mod error;
pub mod export;
pub mod inference;
pub mod input;
pub mod reshape;
pub mod summary;
pub mod table;

mod cleaner;

pub use crate::cleaner::{CleanResult, Cleaner, CleanerConfig};
pub use error::{Result, TabcleanError};
pub use export::{export_path, ExportFormat, Exporter};
pub use inference::{infer, ColumnReport, InferenceConfig, InferenceResult, TypeInference};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use reshape::ReshapeOptions;
pub use summary::{ColumnSummary, NumericSummary, TableSummary};
pub use table::{Cell, Column, ColumnType, Table};
