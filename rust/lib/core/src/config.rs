use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that selects the upstream firewall API.
pub const BACKEND_URL_ENV: &str = "PUBLIC_BACKEND_URL";

/// Upstream base URL used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// Default listen address of the dashboard server.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:5173";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Dashboard configuration.
///
/// Resolved in three layers: built-in defaults, an optional TOML file,
/// then the `PUBLIC_BACKEND_URL` environment variable.
///
/// ```toml
/// backend_url = "http://firewall-api.internal:3000"
/// listen = "127.0.0.1:5173"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the upstream firewall management API.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Listen address for the HTTP server.
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            listen: default_listen(),
        }
    }
}

impl DashboardConfig {
    /// Load config from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: DashboardConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Overlay the process environment on this config.
    pub fn apply_env(self) -> Self {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary lookup. Empty values are ignored.
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        self
    }

    /// Backend URL without trailing slashes.
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    /// Reject configurations the server cannot start with.
    pub fn verify(&self) -> Result<(), ConfigError> {
        let base = self.backend_base();
        if base.is_empty() {
            return Err(ConfigError::Invalid("backend_url is empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "backend_url must be an http(s) URL, got {base}"
            )));
        }
        if self.listen.trim().is_empty() {
            return Err(ConfigError::Invalid("listen address is empty".into()));
        }
        Ok(())
    }
}
