//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use tabclean::{ExportFormat, InferenceConfig, ParserConfig, ReshapeOptions};

/// tabclean: infer column types and clean spreadsheet exports
#[derive(Parser)]
#[command(name = "tabclean")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the first rows of a data file
    Preview {
        /// Path to the data file (CSV/TSV, or xlsx with the excel feature)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value = "20")]
        rows: usize,

        #[command(flatten)]
        shape: ShapeArgs,
    },

    /// Infer column types and export the cleaned table
    Clean {
        /// Path to the data file (CSV/TSV, or xlsx with the excel feature)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        shape: ShapeArgs,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Output format: csv, tsv, json, parquet or xlsx
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Directory for <stem>_cleaned.<ext> (default: next to FILE)
        #[arg(long, conflicts_with = "output")]
        output_dir: Option<PathBuf>,

        /// Exact output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show per-column statistics after inference
    Stats {
        /// Path to the data file (CSV/TSV, or xlsx with the excel feature)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only show this column
        #[arg(short, long)]
        column: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        shape: ShapeArgs,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
}

/// Loading and reshaping options shared by all subcommands.
#[derive(Args, Clone, Debug, Default)]
pub struct ShapeArgs {
    /// Remove this many rows from the top before anything else
    #[arg(long, default_value = "0")]
    pub skip_rows: usize,

    /// Use the first remaining row as column headers
    #[arg(long)]
    pub header_row: bool,

    /// Keep only these columns, in this order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Field delimiter (default: auto-detect)
    #[arg(short, long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

impl ShapeArgs {
    /// Parser settings. With `--header-row` the file is read without a
    /// header so title rows above the real header stay in the data.
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            delimiter: self.delimiter,
            has_header: !self.header_row,
            ..Default::default()
        }
    }

    pub fn reshape_options(&self) -> ReshapeOptions {
        ReshapeOptions {
            skip_rows: self.skip_rows,
            header_from_first_row: self.header_row,
            columns: self.columns.clone(),
        }
    }
}

/// Inference thresholds.
#[derive(Args, Clone, Debug)]
pub struct ThresholdArgs {
    /// Share of non-missing cells that must parse as dates
    #[arg(long, default_value = "0.6")]
    pub datetime_threshold: f64,

    /// Share of non-missing cells that must parse as numbers
    #[arg(long, default_value = "0.8")]
    pub numeric_threshold: f64,
}

impl ThresholdArgs {
    pub fn inference_config(&self) -> InferenceConfig {
        InferenceConfig::new(self.datetime_threshold, self.numeric_threshold)
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ => {
            let bytes = s.as_bytes();
            if bytes.len() == 1 {
                Ok(bytes[0])
            } else {
                Err(format!("Delimiter must be a single character, got '{}'", s))
            }
        }
    }
}
