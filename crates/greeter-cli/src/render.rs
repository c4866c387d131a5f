//! Turning operation results into the text shown to the user.
//!
//! Failures show the HTTP status code when the service answered, and the
//! error text otherwise.

use greeter_client::Error;

/// User-facing action, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Logging in
    Login,
    /// Logging out
    Logout,
    /// Creating an account
    Register,
    /// Deleting an account
    DeleteAccount,
    /// Listing greeting languages
    Languages,
    /// Fetching a greeting
    Greet,
    /// Reading or writing the language preference
    Preference,
    /// Looking up accounts
    User,
}

impl Action {
    fn failure_label(self) -> &'static str {
        match self {
            Self::Login => "Login failure",
            Self::Logout => "Logout failure",
            Self::Register => "Registration failure",
            Self::DeleteAccount => "Delete failure",
            Self::Languages => "Failed to get languages",
            Self::Greet => "Greeting Failure",
            Self::Preference => "Preference failure",
            Self::User => "User failure",
        }
    }
}

/// Text to print plus whether the action succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Lines for stdout
    pub lines: Vec<String>,
    /// Whether the action succeeded
    pub success: bool,
}

impl Output {
    /// A one-line success.
    pub fn ok(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            success: true,
        }
    }

    /// A multi-line success.
    pub fn ok_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            success: true,
        }
    }

    /// A failed action.
    pub fn failure(action: Action, err: &Error) -> Self {
        Self {
            lines: vec![failure_text(action, err)],
            success: false,
        }
    }
}

/// The failure line for an action.
pub fn failure_text(action: Action, err: &Error) -> String {
    match err {
        Error::NotLoggedIn | Error::PasswordMismatch => err.to_string(),
        _ => match err.status_code() {
            Some(status) => format!("{}: {status}", action.failure_label()),
            None => format!("{}: {err}", action.failure_label()),
        },
    }
}
