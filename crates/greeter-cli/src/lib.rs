//! # greeter-cli
//!
//! Command-line front end for the greeter services.
//!
//! Each invocation loads the session slot from its file, runs one command
//! against it and stores it back:
//! - `status`, `login`, `logout`, `register`, `delete-account`
//! - `languages`, `greet`, `prefs get|set`
//! - `whoami`, `users`
//! - `config path|get|set|init|export`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config_handlers;
pub mod error;
pub mod render;

use greeter_client::{ClientConfig, FileSessionStore, GreeterClient, SessionStore};

pub use error::{Error, Result};

use crate::cli::Cli;
use crate::render::Output;

/// Resolve configuration for a session command, applying CLI overrides.
///
/// Validation runs once, after the flags, so a flag can repair a bad value
/// from the file or environment.
pub fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::load_unvalidated(cli.config.as_deref())?;
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(path) = &cli.session_file {
        config.session_file = Some(path.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Run a session command: load the slot, execute, store the slot.
pub async fn run_session_command(cli: Cli) -> Result<Output> {
    let config = resolve_config(&cli)?;
    let store = FileSessionStore::new(config.session_path().ok_or(Error::NoSessionLocation)?);
    let client = GreeterClient::new(config)?;

    let mut slot = store.load()?;
    let output = commands::execute(&client, &mut slot, cli.command).await;
    store.save(&slot)?;
    Ok(output)
}
