//! Example: Clean a tabular data file with tabclean.
//!
//! Usage:
//!   cargo run --example clean -- <file_path> [skip_rows]
//!
//! Example:
//!   cargo run --example clean -- exports/survey.csv 2
//!
//! With a row count, that many rows are removed from the top and the next
//! row is used as the header.

use std::env;
use std::path::Path;

use tabclean::{
    export_path, Cleaner, CleanerConfig, ExportFormat, Exporter, ParserConfig, ReshapeOptions,
};

fn main() -> tabclean::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example clean -- <file_path> [skip_rows]");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example clean -- exports/survey.csv 2");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let mut config = CleanerConfig::default();
    if let Some(skip) = args.get(2).and_then(|s| s.parse::<usize>().ok()) {
        config.parser = ParserConfig {
            has_header: false,
            ..Default::default()
        };
        config.reshape = ReshapeOptions::new()
            .skip_rows(skip)
            .header_from_first_row(true);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("tabclean: {}", file_path);
    println!("{}", separator);
    println!();

    let cleaned = Cleaner::with_config(config).clean_file(path)?;

    // Print source metadata
    println!("## Source Metadata");
    println!("  File: {}", cleaned.source.file);
    println!("  Format: {}", cleaned.source.format);
    println!("  Rows: {}", cleaned.source.row_count);
    println!("  Columns: {}", cleaned.source.column_count);
    println!();

    // Print the decision for each column
    println!("## Column Types ({} columns)", cleaned.result.reports.len());
    println!();
    for report in &cleaned.result.reports {
        println!(
            "  {:20} {:10} numeric={:<6.2} datetime={:<6.2} dropped={}",
            report.name,
            report.column_type,
            report.numeric_ratio,
            report.datetime_ratio,
            report.coerced_to_missing
        );
    }
    println!();

    // Print numeric summaries
    println!("## Numeric Columns");
    println!();
    for summary in &cleaned.summary.columns {
        if let Some(stats) = &summary.numeric {
            println!(
                "  {:20} mean={:<10.3} median={:<10.3} min={} max={}",
                summary.name, stats.mean, stats.median, stats.min, stats.max
            );
        }
    }
    println!();

    let output = export_path(path, None, ExportFormat::Csv);
    Exporter::new(ExportFormat::Csv).write_file(cleaned.table(), &output)?;
    println!("Cleaned data written to {}", output.display());

    Ok(())
}
