//! CLI command implementations.

pub mod clean;
pub mod preview;
pub mod stats;

use std::path::Path;

use tabclean::{Cleaner, CleanerConfig};

use crate::cli::{ShapeArgs, ThresholdArgs};

/// Build a cleaner from the shared flags.
pub(crate) fn build_cleaner(shape: &ShapeArgs, thresholds: Option<&ThresholdArgs>) -> Cleaner {
    let config = CleanerConfig {
        parser: shape.parser_config(),
        reshape: shape.reshape_options(),
        inference: thresholds
            .map(ThresholdArgs::inference_config)
            .unwrap_or_default(),
    };
    Cleaner::with_config(config)
}

pub(crate) fn ensure_exists(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    Ok(())
}
