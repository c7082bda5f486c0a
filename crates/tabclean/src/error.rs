//! Error types for the tabclean library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tabclean operations.
#[derive(Debug, Error)]
pub enum TabcleanError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the Parquet writer.
    #[error("Parquet error: {0}")]
    Parquet(String),

    /// Error from the xlsx reader or writer.
    #[error("Excel error: {0}")]
    Excel(String),

    /// Format not supported (or not compiled in).
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Columns of a table disagree on names or length.
    #[error("Invalid table shape: {0}")]
    Shape(String),

    /// Row or column selection that does not fit the table.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TabcleanError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TabcleanError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for tabclean operations.
pub type Result<T> = std::result::Result<T, TabcleanError>;
