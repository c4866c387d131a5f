//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Greeter CLI - log in, manage your account and fetch greetings
#[derive(Parser, Debug)]
#[command(name = "greeter", version)]
#[command(about = "Client for the greeter login and greetings services", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the session file location
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show whether a session is held
    Status,
    /// Log in and keep the session
    Login {
        /// Account name
        user: String,
        /// Password
        #[arg(long, env = "GREETER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Create an account
    Register {
        /// Account name
        user: String,
        /// Password
        #[arg(long, env = "GREETER_PASSWORD", hide_env_values = true)]
        password: String,
        /// Password, typed again
        #[arg(long = "repeat", env = "GREETER_PASSWORD_REPEAT", hide_env_values = true)]
        password_repeat: String,
    },
    /// Delete the logged-in account
    DeleteAccount,
    /// List greeting languages
    Languages,
    /// Fetch a greeting (defaults to the preferred language)
    Greet {
        /// Language code
        language: Option<String>,
    },
    /// Greeting-language preference
    Prefs {
        /// Read or write
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Show the logged-in account
    Whoami,
    /// List account ids
    Users,
    /// Configuration file maintenance
    Config {
        /// Config operation
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Preference subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PrefsAction {
    /// Show the preferred language
    Get,
    /// Change the preferred language
    Set {
        /// Language code
        language: String,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,
    /// Print a value by dotted key
    Get {
        /// Dotted key, e.g. `base_url`
        key: String,
    },
    /// Set a value by dotted key
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Write a default config file
    Init {
        /// Target file (defaults to the platform config directory)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=value` arguments
        #[arg(long)]
        docker_env: bool,
    },
}
