//! JSON bodies exchanged with the login and greetings services.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// Login service
// ============================================================================

/// User name and password, as accepted by `/users` and `/login`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Account name
    pub user_name: String,
    /// Plain-text password
    pub user_password: String,
}

impl Credentials {
    /// Create credentials from a name and password.
    pub fn new(user_name: impl Into<String>, user_password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            user_password: user_password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("user_password", &"<redacted>")
            .finish()
    }
}

/// A checked registration request.
///
/// Construction enforces that the password was typed the same way twice,
/// so a mismatch never reaches the service.
#[derive(Clone, Debug)]
pub struct Registration {
    credentials: Credentials,
}

impl Registration {
    /// Validate a registration form.
    pub fn new(user: &str, password: &str, password_repeat: &str) -> Result<Self> {
        if user.trim().is_empty() {
            return Err(Error::validation("user", "must not be empty"));
        }
        if password.is_empty() {
            return Err(Error::validation("password", "must not be empty"));
        }
        if password != password_repeat {
            return Err(Error::PasswordMismatch);
        }
        Ok(Self {
            credentials: Credentials::new(user.trim(), password),
        })
    }

    /// The user name being registered.
    pub fn user_name(&self) -> &str {
        &self.credentials.user_name
    }

    /// Credentials to send to the service.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Public record of an account.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    /// Numeric account id
    pub user_id: u64,
    /// Account name
    pub user_name: String,
}

/// All known account ids.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserList {
    /// Account ids in service order
    #[serde(default)]
    pub user_ids: Vec<u64>,
}

/// Successful login answer.
///
/// Older login services answer with a bare `token` and no ids; those
/// fields default so the answer still parses.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Account id of the logged-in user
    #[serde(default)]
    pub user_id: u64,
    /// Server-side identifier of this login
    #[serde(default)]
    pub login_id: String,
    /// Token presented on authenticated calls
    #[serde(alias = "token")]
    pub access_token: String,
    /// Token for obtaining a new access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("user_id", &self.user_id)
            .field("login_id", &self.login_id)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Body of a logout call.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogoutRequest {
    /// Token whose login is terminated
    pub access_token: String,
}

impl fmt::Debug for LogoutRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoutRequest")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Greetings service
// ============================================================================

/// Greeting languages offered by the service, keyed by language code.
///
/// The service wraps the map in a `languages` object; a bare map is accepted
/// too.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "LanguagesWire")]
pub struct Languages {
    languages: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LanguagesWire {
    Wrapped { languages: BTreeMap<String, String> },
    Flat(BTreeMap<String, String>),
}

impl From<LanguagesWire> for Languages {
    fn from(wire: LanguagesWire) -> Self {
        match wire {
            LanguagesWire::Wrapped { languages } | LanguagesWire::Flat(languages) => {
                Self { languages }
            }
        }
    }
}

impl Languages {
    /// Language codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Resource path the service advertises for a language.
    pub fn link(&self, code: &str) -> Option<&str> {
        self.languages.get(code).map(String::as_str)
    }

    /// Whether a language is offered.
    pub fn contains(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    /// Number of languages.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Whether no language is offered.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl FromIterator<(String, String)> for Languages {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            languages: iter.into_iter().collect(),
        }
    }
}

/// A greeting rendered for the logged-in user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Greeting {
    /// Language code of the message
    pub language: String,
    /// Greeting text
    pub message: String,
}

/// Stored greeting-language preference of a user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguagePreference {
    /// Account id
    pub user_id: u64,
    /// Account name
    #[serde(default)]
    pub user_name: String,
    /// Preferred language code
    pub language: String,
}

/// Body of a preference update.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceUpdate {
    /// New preferred language code
    pub language: String,
}
