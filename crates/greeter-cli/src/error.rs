//! Error types for greeter-cli

use thiserror::Error;

/// Result type alias for greeter-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in greeter-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from greeter-client
    #[error(transparent)]
    Client(#[from] greeter_client::Error),

    /// Neither the config nor the platform provide a session file location
    #[error("Could not determine where to keep the session; pass --session-file")]
    NoSessionLocation,
}
