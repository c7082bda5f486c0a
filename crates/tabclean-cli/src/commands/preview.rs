//! Preview command - show the first rows of a (reshaped) file.

use std::path::PathBuf;

use colored::Colorize;
use tabclean::reshape::reshape;
use tabclean::Table;

use super::{build_cleaner, ensure_exists};
use crate::cli::ShapeArgs;

/// Widest a column is printed before truncating.
const MAX_WIDTH: usize = 24;

pub fn run(file: PathBuf, rows: usize, shape: ShapeArgs) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&file)?;

    let cleaner = build_cleaner(&shape, None);
    let (table, source) = cleaner.load(&file)?;
    let table = reshape(&table, &cleaner.config().reshape)?;

    println!(
        "{} {} ({} rows x {} columns)",
        "Preview of".cyan().bold(),
        source.file.white(),
        table.row_count(),
        table.column_count()
    );

    for step in cleaner.config().reshape.describe() {
        println!("  {} {}", "•".dimmed(), step.dimmed());
    }
    println!();

    print_table(&table.head(rows));

    if table.row_count() > rows {
        println!();
        println!(
            "{}",
            format!("... {} more rows", table.row_count() - rows).dimmed()
        );
    }

    Ok(())
}

fn print_table(table: &Table) {
    let widths: Vec<usize> = table
        .columns()
        .iter()
        .map(|column| {
            let cells = column
                .cells
                .iter()
                .map(|c| c.render().map(|s| s.chars().count()).unwrap_or(0));
            cells
                .chain(std::iter::once(column.name.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_WIDTH)
        })
        .collect();

    let header: Vec<String> = table
        .column_names()
        .iter()
        .zip(&widths)
        .map(|(name, &w)| format!("{:w$}", truncate(name, w), w = w))
        .collect();
    println!("{}", header.join("  ").bold());

    for row in 0..table.row_count() {
        let line: Vec<String> = table
            .columns()
            .iter()
            .zip(&widths)
            .map(|(column, &w)| match column.cells[row].render() {
                Some(text) => format!("{:w$}", truncate(&text, w), w = w),
                None => format!("{:w$}", "", w = w),
            })
            .collect();
        println!("{}", line.join("  "));
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 4), "abc…");
    }
}
