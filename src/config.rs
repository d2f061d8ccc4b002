//! Client configuration

use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// API used when `ONEBOX_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "https://hiring.reachinbox.xyz/api/v1";

const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 120;

/// Where the inbox reads from when the API list call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFallback {
    /// Serve the built-in sample threads, ignoring local deletes.
    #[default]
    MockDataset,
    /// Serve the local mirror, so local deletes and replies stay visible.
    LocalMirror,
}

impl ListFallback {
    /// The `ONEBOX_LIST_FALLBACK` value that selects this policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MockDataset => "mock",
            Self::LocalMirror => "mirror",
        }
    }
}

impl fmt::Display for ListFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListFallback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::MockDataset),
            "mirror" => Ok(Self::LocalMirror),
            other => Err(Error::Config(format!(
                "Invalid ONEBOX_LIST_FALLBACK '{other}' (expected mock or mirror)"
            ))),
        }
    }
}

/// Onebox client configuration
#[derive(Debug, Clone)]
pub struct OneboxConfig {
    /// Base of the REST API, e.g. `https://host/api/v1`.
    pub api_base: Url,
    /// Directory holding the credential and the thread mirror.
    pub state_dir: PathBuf,
    pub list_fallback: ListFallback,
    /// How long `login` waits for the callback URL.
    pub login_timeout: Duration,
}

impl OneboxConfig {
    /// Load configuration from environment variables
    ///
    /// Reads from `.env` file if present. All variables are optional:
    /// - `ONEBOX_API_BASE` (default: [`DEFAULT_API_BASE`])
    /// - `ONEBOX_STATE_DIR` (default: the platform data directory)
    /// - `ONEBOX_LIST_FALLBACK` (`mock` or `mirror`, default: `mock`)
    /// - `ONEBOX_LOGIN_TIMEOUT_SECS` (default: `120`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`OneboxConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base = lookup("ONEBOX_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(api_base.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("Invalid ONEBOX_API_BASE: {e}")))?;

        let state_dir = match lookup("ONEBOX_STATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_state_dir()?,
        };

        let list_fallback = lookup("ONEBOX_LIST_FALLBACK")
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or_default();

        let login_timeout = lookup("ONEBOX_LOGIN_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_LOGIN_TIMEOUT_SECS.to_string())
            .parse()
            .map(Duration::from_secs)
            .map_err(|e| Error::Config(format!("Invalid ONEBOX_LOGIN_TIMEOUT_SECS: {e}")))?;

        Ok(Self {
            api_base,
            state_dir,
            list_fallback,
            login_timeout,
        })
    }
}

fn default_state_dir() -> Result<PathBuf> {
    ProjectDirs::from("xyz", "reachinbox", "onebox")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| Error::Config("No home directory; set ONEBOX_STATE_DIR".into()))
}
