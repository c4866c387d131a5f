//! Client-held login state.
//!
//! A [`SessionSlot`] is the explicit session context every authenticated
//! call receives. It is either empty or holds exactly one [`Session`];
//! a session is created whole on login, replaced whole on the next login,
//! and dropped whole on logout. It is never edited in place.
//!
//! [`SessionStore`] implementations carry a slot across process runs.
//!
//! # Usage
//!
//! ```rust
//! use greeter_client::session::{AuthStatus, Session, SessionSlot};
//!
//! let mut slot = SessionSlot::empty();
//! assert_eq!(slot.status(), AuthStatus::NotLoggedIn);
//!
//! slot.begin(Session::new(7, "login-1", "tobo", "access", None));
//! assert!(slot.is_authenticated());
//!
//! let ended = slot.end();
//! assert_eq!(ended.map(|s| s.user_id), Some(7));
//! assert!(!slot.is_authenticated());
//! ```

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::models::LoginResponse;
use crate::{Error, Result};

// ============================================================================
// Session
// ============================================================================

/// Credentials of one login.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Account id
    pub user_id: u64,
    /// Server-side login id
    pub login_id: String,
    /// Account name used to log in
    pub user_name: String,
    /// Token presented on authenticated calls
    pub access_token: String,
    /// Token for obtaining a new access token, when the service issues one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// When the login completed
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Create a session stamped with the current time.
    pub fn new(
        user_id: u64,
        login_id: impl Into<String>,
        user_name: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            user_id,
            login_id: login_id.into(),
            user_name: user_name.into(),
            access_token: access_token.into(),
            refresh_token,
            logged_in_at: Utc::now(),
        }
    }

    /// Build a session from a login answer.
    pub fn from_login(user_name: impl Into<String>, resp: LoginResponse) -> Self {
        Self::new(
            resp.user_id,
            resp.login_id,
            user_name,
            resp.access_token,
            resp.refresh_token,
        )
    }

    /// Account id for per-account requests.
    ///
    /// Login services that answer with tokens only leave the id at 0, which
    /// names no account; such a session cannot address `users/{id}`.
    pub fn account_id(&self) -> Result<u64> {
        if self.user_id == 0 {
            return Err(Error::validation(
                "user id",
                "the login service did not report an account id for this session",
            ));
        }
        Ok(self.user_id)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("login_id", &self.login_id)
            .field("user_name", &self.user_name)
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("logged_in_at", &self.logged_in_at)
            .finish()
    }
}

// ============================================================================
// AuthStatus
// ============================================================================

/// Whether a session is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// A session is held.
    LoggedIn,
    /// The slot is empty.
    NotLoggedIn,
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggedIn => write!(f, "Logged in"),
            Self::NotLoggedIn => write!(f, "Not logged in"),
        }
    }
}

// ============================================================================
// SessionSlot
// ============================================================================

/// The session context: empty, or holding the current login.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSlot {
    current: Option<Session>,
}

impl SessionSlot {
    /// An empty slot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A slot already holding a session.
    pub fn with_session(session: Session) -> Self {
        Self {
            current: Some(session),
        }
    }

    /// Whether a session is present.
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Current authentication status.
    pub fn status(&self) -> AuthStatus {
        if self.is_authenticated() {
            AuthStatus::LoggedIn
        } else {
            AuthStatus::NotLoggedIn
        }
    }

    /// The held session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// The held session, or [`Error::NotLoggedIn`].
    pub fn require(&self) -> Result<&Session> {
        self.current.as_ref().ok_or(Error::NotLoggedIn)
    }

    /// Install a new session, returning the one it replaced.
    pub fn begin(&mut self, session: Session) -> Option<Session> {
        tracing::info!(user_id = session.user_id, user = %session.user_name, "session started");
        self.current.replace(session)
    }

    /// Drop the held session, returning it.
    pub fn end(&mut self) -> Option<Session> {
        let ended = self.current.take();
        if let Some(s) = &ended {
            tracing::info!(user_id = s.user_id, user = %s.user_name, "session ended");
        }
        ended
    }
}

// ============================================================================
// SessionStore
// ============================================================================

/// Persistence for a [`SessionSlot`].
pub trait SessionStore: Send + Sync {
    /// Load the stored slot; absent state loads as an empty slot.
    fn load(&self) -> Result<SessionSlot>;

    /// Persist a slot. Saving an empty slot removes stored state.
    fn save(&self, slot: &SessionSlot) -> Result<()>;
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<SessionSlot>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<SessionSlot> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| Error::config("session store lock poisoned"))?;
        Ok(slot.clone())
    }

    fn save(&self, slot: &SessionSlot) -> Result<()> {
        let mut stored = self
            .slot
            .lock()
            .map_err(|_| Error::config("session store lock poisoned"))?;
        *stored = slot.clone();
        Ok(())
    }
}

/// Session store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// File name used inside the data directory.
    pub const FILE_NAME: &'static str = "session.json";

    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `<data dir>/greeter/session.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("greeter").join(Self::FILE_NAME))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, contents: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| Error::io_with_path(e, dir))?;

        // NamedTempFile is created 0600 with a unique name.
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io_with_path(e, dir))?;
        tmp.write_all(contents.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| Error::io_with_path(e, tmp.path()))?;
        tmp.persist(&self.path)
            .map_err(|e| Error::io_with_path(e.error, &self.path))?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<SessionSlot> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionSlot::empty());
            }
            Err(e) => return Err(Error::io_with_path(e, &self.path)),
        };
        let session: Session = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), "loaded session");
        Ok(SessionSlot::with_session(session))
    }

    fn save(&self, slot: &SessionSlot) -> Result<()> {
        match slot.session() {
            Some(session) => {
                let json = serde_json::to_string_pretty(session)?;
                self.write_atomic(&json)
            }
            None => match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(Error::io_with_path(e, &self.path)),
            },
        }
    }
}
