//! Command-line front end for the bookmark core.
//!
//! # Responsibility
//! - Resolve configuration from environment and flags.
//! - Print results as JSON and map core errors to status codes.

mod commands;

use bookmark_core::{CoreConfig, LoggingError};
use clap::Parser;
use commands::{execute, Cli};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("status=400 error={err}");
            return ExitCode::from(2);
        }
    };
    if let Err(err) = config.init_logging() {
        eprintln!("status=500 error={err}");
        return ExitCode::from(2);
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        bookmark_core::core_version()
    );

    match execute(cli.command, &config.db_path) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig, LoggingError> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Some(level) = cli.log_level.as_deref() {
        config.log_level = bookmark_core::logging::normalize_level(level)?;
    }
    if let Some(dir) = cli.log_dir.clone() {
        config.log_dir = Some(dir);
    }
    Ok(config)
}
