//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional JSON config
//! file, then environment overrides, then command-line flags (applied by the
//! CLI through the `with_*` builders).

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, DEMO_HISTORY_FILE, DEMO_PASSWORD,
    DEMO_USERNAME, ENV_API_URL, ENV_STATE_DIR, HISTORY_LIMIT, SESSION_FILE, STATE_DIR_NAME,
};
use crate::error::{ChemvizError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Global configuration for chemviz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the remote dataset service (no trailing slash needed)
    pub api_base_url: String,

    /// Timeout applied to every remote request
    pub request_timeout_secs: u64,

    /// Number of uploads kept in the local demo history
    pub history_limit: usize,

    /// Credentials accepted offline when the remote service is unreachable
    pub demo_username: String,
    pub demo_password: String,

    /// Directory holding the saved session and the demo history
    pub state_dir: PathBuf,

    /// Directory reports are written to
    pub report_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let state_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STATE_DIR_NAME);

        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            history_limit: HISTORY_LIMIT,
            demo_username: DEMO_USERNAME.to_string(),
            demo_password: DEMO_PASSWORD.to_string(),
            state_dir,
            report_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Load a configuration file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ChemvizError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text).map_err(|e| {
            ChemvizError::configuration(format!("invalid config file {}: {e}", path.display()))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `CHEMVIZ_API_URL` / `CHEMVIZ_STATE_DIR` when set
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            debug!("Using API base URL from {}", ENV_API_URL);
            self.api_base_url = url;
        }
        if let Some(dir) = lookup(ENV_STATE_DIR).filter(|v| !v.trim().is_empty()) {
            debug!("Using state directory from {}", ENV_STATE_DIR);
            self.state_dir = PathBuf::from(dir);
        }
        self
    }

    /// Set the remote service base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the local history limit
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set the state directory
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = dir.into();
        self
    }

    /// Set the report output directory
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    /// Set the offline demo credentials
    pub fn with_demo_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.demo_username = username.into();
        self.demo_password = password.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join(SESSION_FILE)
    }

    pub fn demo_history_file(&self) -> PathBuf {
        self.state_dir.join(DEMO_HISTORY_FILE)
    }

    /// Check settings that would make every later operation fail
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ChemvizError::configuration("api_base_url must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ChemvizError::configuration(
                "request_timeout_secs must be greater than zero",
            ));
        }
        if self.history_limit == 0 {
            return Err(ChemvizError::configuration(
                "history_limit must be greater than zero",
            ));
        }
        Ok(())
    }
}
