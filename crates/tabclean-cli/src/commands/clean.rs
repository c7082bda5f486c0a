//! Clean command - infer column types and export the cleaned table.

use std::path::PathBuf;

use colored::Colorize;
use tabclean::{export_path, ColumnType, ExportFormat, Exporter};

use super::{build_cleaner, ensure_exists};
use crate::cli::{ShapeArgs, ThresholdArgs};

pub fn run(
    file: PathBuf,
    shape: ShapeArgs,
    thresholds: ThresholdArgs,
    format: ExportFormat,
    output_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&file)?;

    if !format.is_available() {
        return Err(format!(
            "{} support not enabled. Rebuild with --features {}",
            format,
            format.feature().unwrap_or_default()
        )
        .into());
    }

    println!(
        "{} {}",
        "Cleaning".cyan().bold(),
        file.display().to_string().white()
    );

    let cleaner = build_cleaner(&shape, Some(&thresholds));
    let cleaned = cleaner.clean_file(&file)?;

    println!();
    println!("{}", "Column types:".yellow().bold());
    for report in &cleaned.result.reports {
        let tag = paint(report.column_type);
        if verbose {
            println!(
                "  {:24} {:10} numeric {:>5.1}%  datetime {:>5.1}%  dropped {}",
                report.name,
                tag,
                report.numeric_ratio * 100.0,
                report.datetime_ratio * 100.0,
                report.coerced_to_missing
            );
        } else if report.coerced_to_missing > 0 {
            println!(
                "  {:24} {:10} ({} values set to missing)",
                report.name,
                tag,
                report.coerced_to_missing.to_string().yellow()
            );
        } else {
            println!("  {:24} {}", report.name, tag);
        }
    }

    let output_path =
        output.unwrap_or_else(|| export_path(&file, output_dir.as_deref(), format));
    Exporter::new(format).write_file(cleaned.table(), &output_path)?;

    println!();
    println!(
        "{} {} ({} rows, {} columns)",
        "Saved to".green().bold(),
        output_path.display().to_string().white(),
        cleaned.table().row_count(),
        cleaned.table().column_count()
    );

    Ok(())
}

fn paint(column_type: ColumnType) -> colored::ColoredString {
    let label = column_type.as_str();
    match column_type {
        ColumnType::Empty => label.dimmed(),
        ColumnType::DateTime => label.magenta(),
        ColumnType::Integer | ColumnType::Float => label.blue(),
        ColumnType::String => label.green(),
    }
}
