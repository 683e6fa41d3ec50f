use clap::Parser;
use colored::*;
use parablast::cli::Cli;
use parablast::ParablastError;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging with PARABLAST_LOG environment variable support
    let log_level = std::env::var("PARABLAST_LOG").unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = parablast::pipeline::run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        // Exit codes keyed on the error class, for scripting around failures
        let exit_code = match e.downcast_ref::<ParablastError>() {
            Some(ParablastError::ToolMissing(_)) => 2,
            Some(ParablastError::ToolFailed { .. }) => 3,
            Some(ParablastError::Io(_)) => 4,
            Some(ParablastError::InvalidInput(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}
