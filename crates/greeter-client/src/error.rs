//! Error types for greeter-client

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for greeter-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in greeter-client
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An authenticated operation was attempted with an empty session slot.
    #[error("Not logged in")]
    NotLoggedIn,

    /// Registration password and its repetition differ.
    #[error("Passwords are not equal")]
    PasswordMismatch,

    /// Caller-supplied input was rejected before any request was sent.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending input
        field: &'static str,
        /// What went wrong
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("HTTP status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body text, possibly empty
        body: String,
    },

    /// HTTP client error (connection, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error on a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

impl Error {
    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a validation error for the named input.
    pub fn validation<S: Into<String>>(field: &'static str, message: S) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    /// Wraps an I/O error together with the path it happened on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// HTTP status code carried by this error, if any.
    ///
    /// Transport errors that still produced a response (e.g. a failed
    /// `error_for_status`) report their status as well.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the failure was caused by the caller rather than the
    /// service or the network.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::NotLoggedIn | Error::PasswordMismatch | Error::Validation { .. } => true,
            Error::Status { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}
