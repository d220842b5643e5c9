//! Client configuration: where the dashboard lives and how often to ask it.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Environment variable consulted when no URL flag is given.
pub const URL_ENV_VAR: &str = "SDASH_DASHBOARD_URL";

/// Environment variable overriding the service list poll cadence.
pub const POLL_INTERVAL_ENV_VAR: &str = "SDASH_POLL_INTERVAL_SECS";

/// Default dashboard base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4280";

fn default_poll_secs() -> u64 {
    2
}

fn default_reconnect_base_secs() -> u64 {
    1
}

fn default_reconnect_max_secs() -> u64 {
    30
}

/// Dashboard client configuration with sensible defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the dashboard HTTP API.
    pub base_url: String,

    /// Seconds between service list polls.
    #[serde(default = "default_poll_secs")]
    pub poll_interval_secs: u64,

    /// Initial reconnect delay for the health stream, in seconds.
    #[serde(default = "default_reconnect_base_secs")]
    pub reconnect_base_secs: u64,

    /// Reconnect delay cap for the health stream, in seconds.
    #[serde(default = "default_reconnect_max_secs")]
    pub reconnect_max_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_secs: default_poll_secs(),
            reconnect_base_secs: default_reconnect_base_secs(),
            reconnect_max_secs: default_reconnect_max_secs(),
        }
    }
}

impl DashboardConfig {
    /// Resolve the base URL from an explicit flag, the `SDASH_DASHBOARD_URL`
    /// environment variable, or the default, in that order. The poll cadence
    /// can be overridden through `SDASH_POLL_INTERVAL_SECS`.
    pub fn resolve(url_flag: Option<String>) -> Result<Self> {
        let base_url = url_flag
            .or_else(|| std::env::var(URL_ENV_VAR).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self {
            base_url,
            ..Self::default()
        };
        if let Ok(raw) = std::env::var(POLL_INTERVAL_ENV_VAR) {
            config.poll_interval_secs = parse_poll_secs(&raw)?;
        }
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn reconnect_base(&self) -> Duration {
        Duration::from_secs(self.reconnect_base_secs)
    }

    pub fn reconnect_max(&self) -> Duration {
        Duration::from_secs(self.reconnect_max_secs)
    }
}

fn parse_poll_secs(raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(Error::Config(format!(
            "{} must be a positive number of seconds, got {:?}",
            POLL_INTERVAL_ENV_VAR, raw
        ))),
    }
}
