//! Client configuration.
//!
//! [`ClientConfig`] is read from a TOML file and then overridden from
//! `GREETER_*` environment variables. The file is located by
//! [`ConfigManager::resolve_config_path`]: an explicit path wins, then
//! `GREETER_CONFIG`, then `<config dir>/greeter/config.toml`. A missing file
//! yields the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::auth::TokenEncoding;
use crate::session::FileSessionStore;
use crate::{Error, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "GREETER_CONFIG";

const ENV_BASE_URL: &str = "GREETER_BASE_URL";
const ENV_APP_PATH: &str = "GREETER_APP_PATH";
const ENV_TOKEN_ENCODING: &str = "GREETER_TOKEN_ENCODING";
const ENV_TIMEOUT_SECS: &str = "GREETER_TIMEOUT_SECS";

// ============================================================================
// ConfigManager
// ============================================================================

/// Locating, loading and exporting a TOML configuration type.
pub trait ConfigManager: Default + Serialize + DeserializeOwned {
    /// Short project name, used for directory names and messages.
    fn project_name() -> &'static str;

    /// Environment variable that may name the config file.
    fn config_env_var() -> &'static str;

    /// Default config file location for this platform.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve the config file path: explicit, then env var, then default.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(p) = explicit {
            return Some(PathBuf::from(p));
        }
        if let Ok(p) = std::env::var(Self::config_env_var()) {
            if !p.is_empty() {
                return Some(PathBuf::from(p));
            }
        }
        Self::default_config_path()
    }

    /// Load the configuration, falling back to defaults for a missing file.
    fn load(explicit: Option<&str>) -> Result<Self>;

    /// Render as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Render as `KEY=value` environment variable pairs.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>>;
}

// ============================================================================
// ClientConfig
// ============================================================================

/// Where the services live and how to talk to them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the ingress, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Path prefix shared by both services.
    pub app_path: String,
    /// Login service path below `app_path`.
    pub auth_path: String,
    /// Greetings service path below `app_path`.
    pub greeter_path: String,
    /// Bearer token encoding.
    pub token_encoding: TokenEncoding,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Session file; defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            app_path: "/greeter".to_string(),
            auth_path: "auth".to_string(),
            greeter_path: "messages".to_string(),
            token_encoding: TokenEncoding::default(),
            timeout_secs: 30,
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Defaults pointed at another ingress.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Read a TOML file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content).map_err(|e| {
                Error::config(format!("Failed to parse {}: {e}", path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(Error::io_with_path(e, path)),
        }
    }

    /// File plus environment, without [`validate`](Self::validate), for
    /// callers that apply further overrides first.
    pub fn load_unvalidated(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_BASE_URL) {
            self.base_url = v;
        }
        if let Some(v) = lookup(ENV_APP_PATH) {
            self.app_path = v;
        }
        if let Some(v) = lookup(ENV_TOKEN_ENCODING) {
            self.token_encoding = v.parse()?;
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = v.trim().parse().map_err(|_| {
                Error::config(format!("{ENV_TIMEOUT_SECS} must be an integer, got '{v}'"))
            })?;
        }
        Ok(())
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        let url = self.parsed_base_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Session file location.
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session_file
            .clone()
            .or_else(FileSessionStore::default_path)
    }

    /// URL of a login service resource.
    pub fn auth_url(&self, segments: &[&str]) -> Result<Url> {
        self.service_url(&self.auth_path, segments)
    }

    /// URL of a greetings service resource.
    pub fn greeter_url(&self, segments: &[&str]) -> Result<Url> {
        self.service_url(&self.greeter_path, segments)
    }

    fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("invalid base_url '{}': {e}", self.base_url)))
    }

    fn service_url(&self, service: &str, segments: &[&str]) -> Result<Url> {
        let mut url = self.parsed_base_url()?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                Error::config(format!("base_url '{}' cannot be a base", self.base_url))
            })?;
            path.pop_if_empty();
            for prefix in [self.app_path.as_str(), service] {
                path.extend(prefix.split('/').filter(|s| !s.is_empty()));
            }
            path.extend(segments);
        }
        Ok(url)
    }
}

impl ConfigManager for ClientConfig {
    fn project_name() -> &'static str {
        "greeter"
    }

    fn config_env_var() -> &'static str {
        CONFIG_ENV
    }

    fn load(explicit: Option<&str>) -> Result<Self> {
        let config = Self::load_unvalidated(explicit)?;
        config.validate()?;
        Ok(config)
    }

    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![
            (ENV_BASE_URL.to_string(), self.base_url.clone()),
            (ENV_APP_PATH.to_string(), self.app_path.clone()),
            (ENV_TOKEN_ENCODING.to_string(), self.token_encoding.to_string()),
            (ENV_TIMEOUT_SECS.to_string(), self.timeout_secs.to_string()),
        ])
    }
}
