use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use tethys_core::TethysError;

fn main() {
    // Initialize logging with TETHYS_LOG environment variable support
    let log_level = std::env::var("TETHYS_LOG").unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<TethysError>() {
            Some(TethysError::Configuration(_)) => 2,
            Some(TethysError::Io(_)) => 3,
            Some(TethysError::Parse(_)) => 4,
            Some(TethysError::Dataset(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;

    match cli.command {
        Commands::Fetch(args) => crate::cli::commands::fetch::run(args, &config),
        Commands::Join(args) => crate::cli::commands::join::run(args, &config),
        Commands::Niche(args) => crate::cli::commands::niche::run(args, &config),
        Commands::Stages(args) => crate::cli::commands::stages::run(args),
    }
}
