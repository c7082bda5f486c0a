//! tabclean CLI - column type inference for tabular files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Preview { file, rows, shape } => commands::preview::run(file, rows, shape),

        Commands::Clean {
            file,
            shape,
            thresholds,
            format,
            output_dir,
            output,
        } => commands::clean::run(
            file,
            shape,
            thresholds,
            format,
            output_dir,
            output,
            cli.verbose,
        ),

        Commands::Stats {
            file,
            column,
            json,
            shape,
            thresholds,
        } => commands::stats::run(file, column, json, shape, thresholds),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
