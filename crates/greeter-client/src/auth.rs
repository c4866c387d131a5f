//! Bearer authorization for greeter requests.
//!
//! The greetings service base64-decodes the bearer value before it verifies
//! the token, so by default the access token is sent base64-encoded.
//! [`TokenEncoding::Raw`] sends the token unchanged for services that expect
//! the plain value.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How the access token is written into the `Authorization` header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenEncoding {
    /// Send the token as-is.
    Raw,
    /// Send the standard base64 encoding of the token.
    #[default]
    Base64,
}

impl TokenEncoding {
    /// Encode a token for transport.
    pub fn encode(self, token: &str) -> String {
        match self {
            Self::Raw => token.to_string(),
            Self::Base64 => STANDARD.encode(token.as_bytes()),
        }
    }
}

impl fmt::Display for TokenEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

impl FromStr for TokenEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "base64" => Ok(Self::Base64),
            other => Err(Error::config(format!(
                "unknown token encoding '{other}' (expected 'raw' or 'base64')"
            ))),
        }
    }
}

/// Build the `Authorization` header value for an access token.
pub fn authorization_value(token: &str, encoding: TokenEncoding) -> Result<String> {
    if token.is_empty() {
        return Err(Error::validation("access token", "must not be empty"));
    }
    Ok(format!("Bearer {}", encoding.encode(token)))
}
