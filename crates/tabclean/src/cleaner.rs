//! Main Cleaner struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::inference::{InferenceConfig, InferenceResult, TypeInference};
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::reshape::{reshape, ReshapeOptions};
use crate::summary::TableSummary;
use crate::table::Table;

/// Configuration for a cleaning run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Parser configuration.
    #[serde(skip)]
    pub parser: ParserConfig,
    /// Reshape steps applied before inference.
    #[serde(default)]
    pub reshape: ReshapeOptions,
    /// Inference thresholds.
    #[serde(default)]
    pub inference: InferenceConfig,
}

/// Result of cleaning a data file.
#[derive(Debug, Clone)]
pub struct CleanResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Cleaned table with inferred types.
    pub result: InferenceResult,
    /// Per-column summary of the cleaned table.
    pub summary: TableSummary,
}

impl CleanResult {
    /// The cleaned table.
    pub fn table(&self) -> &Table {
        &self.result.table
    }
}

/// Loads, reshapes and type-infers tabular files.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: CleanerConfig,
    parser: Parser,
    inference: TypeInference,
}

impl Cleaner {
    /// Create a new Cleaner with default configuration.
    pub fn new() -> Self {
        Self::with_config(CleanerConfig::default())
    }

    /// Create a Cleaner with custom configuration.
    pub fn with_config(config: CleanerConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let inference = TypeInference::with_config(config.inference);

        Self {
            config,
            parser,
            inference,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Load a file into a raw table of text and missing cells.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Reshape and infer a loaded table. The input is left untouched.
    pub fn clean(&self, table: &Table) -> Result<InferenceResult> {
        // Reject bad thresholds before doing any work
        self.config.inference.validate()?;

        let shaped = reshape(table, &self.config.reshape)?;
        self.inference.infer(&shaped)
    }

    /// Load, reshape, infer and summarize a file.
    pub fn clean_file(&self, path: impl AsRef<Path>) -> Result<CleanResult> {
        let (table, source) = self.load(path)?;
        let result = self.clean(&table)?;
        let summary = TableSummary::compute(&result);

        info!(
            file = %source.file,
            rows = summary.rows,
            columns = summary.columns.len(),
            "cleaned file"
        );

        Ok(CleanResult {
            source,
            result,
            summary,
        })
    }
}
