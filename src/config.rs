//! Client configuration
//!
//! Settings are layered: built-in defaults, an optional YAML file,
//! environment variables, then command-line flags (applied by the CLI).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable overriding [`Config::base_url`]
pub const ENV_BASE_URL: &str = "INTEGRATION_HUB_BASE_URL";

/// Environment variable overriding [`Config::page_limit`]
pub const ENV_PAGE_LIMIT: &str = "INTEGRATION_HUB_PAGE_LIMIT";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the integrations backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of items requested per page
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Interval between authorization-window polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Optional request timeout. `None` leaves the transport default in place.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_limit: default_page_limit(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_page_limit() -> u32 {
    100
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_user_agent() -> String {
    format!("integration-hub/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Parse a config from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
        if let Some(limit) = lookup(ENV_PAGE_LIMIT) {
            self.page_limit = limit.trim().parse().map_err(|_| {
                Error::config(format!("{ENV_PAGE_LIMIT} must be a positive integer, got '{limit}'"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.page_limit == 0 {
            return Err(Error::config("page_limit must be greater than zero"));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::config("poll_interval_ms must be greater than zero"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
