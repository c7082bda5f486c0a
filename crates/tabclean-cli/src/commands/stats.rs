//! Stats command - per-column summaries after inference.

use std::path::PathBuf;

use colored::Colorize;
use tabclean::ColumnSummary;

use super::{build_cleaner, ensure_exists};
use crate::cli::{ShapeArgs, ThresholdArgs};

pub fn run(
    file: PathBuf,
    column: Option<String>,
    json_output: bool,
    shape: ShapeArgs,
    thresholds: ThresholdArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&file)?;

    let cleaner = build_cleaner(&shape, Some(&thresholds));
    let cleaned = cleaner.clean_file(&file)?;

    let columns: Vec<&ColumnSummary> = match column {
        Some(ref name) => {
            let summary = cleaned
                .summary
                .column(name)
                .ok_or_else(|| format!("Column not found: {}", name))?;
            vec![summary]
        }
        None => cleaned.summary.columns.iter().collect(),
    };

    if json_output {
        let stats = serde_json::json!({
            "file": cleaned.source.file,
            "rows": cleaned.summary.rows,
            "thresholds": cleaner.config().inference,
            "columns": columns,
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows)",
        "Statistics for".cyan().bold(),
        cleaned.source.file.white(),
        cleaned.summary.rows
    );

    for summary in columns {
        println!();
        print_column(summary);
    }

    Ok(())
}

fn print_column(summary: &ColumnSummary) {
    println!(
        "{} {}",
        summary.name.white().bold(),
        format!("[{}]", summary.column_type).dimmed()
    );
    println!(
        "  count {}  missing {} ({:.1}%)  unique {}",
        summary.count,
        summary.missing,
        summary.missing_percentage(),
        summary.unique
    );

    if let Some(ref stats) = summary.numeric {
        println!(
            "  mean {:.4}  std {:.4}  min {}  max {}",
            stats.mean, stats.std, stats.min, stats.max
        );
        println!(
            "  q1 {}  median {}  q3 {}  iqr {}",
            stats.q1,
            stats.median,
            stats.q3,
            stats.iqr()
        );
    }

    if let Some(ref top) = summary.top_values {
        if !top.is_empty() {
            println!("  {}", "top values:".dimmed());
            for (value, count) in top {
                println!("    {:24} {}", value, count);
            }
        }
    }
}
