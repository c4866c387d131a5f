//! Greeter CLI
//!
//! Command-line interface for the greeter login and greetings services.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use greeter_cli::cli::{Cli, Command};
use greeter_cli::config_handlers::handle_config_command;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays clean
    let default_filter = if cli.verbose {
        "warn,greeter_client=debug,greeter_cli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Command::Config { action } = cli.command {
        handle_config_command(cli.config.as_deref(), action)?;
        return Ok(ExitCode::SUCCESS);
    }

    let output = greeter_cli::run_session_command(cli).await?;
    for line in &output.lines {
        println!("{line}");
    }
    if output.success {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::debug!("command failed");
        Ok(ExitCode::FAILURE)
    }
}
