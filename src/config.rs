//! Server configuration, read once from the environment at process start

use std::time::Duration;
use thiserror::Error;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default display name
pub const DEFAULT_APP_NAME: &str = "K8s Demo App";

/// Default display version
pub const DEFAULT_APP_VERSION: &str = "1.0.0";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid PORT value {0:?}: expected an integer between 0 and 65535")]
    InvalidPort(String),

    #[error("Invalid SHUTDOWN_TIMEOUT_SECS value {0:?}: expected a whole number of seconds")]
    InvalidShutdownTimeout(String),
}

/// Immutable server configuration
///
/// Built once in `main` and shared with handlers behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub app_name: String,
    pub app_version: String,
    /// Upper bound on connection draining after SIGTERM (`None` waits forever)
    pub shutdown_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
            shutdown_timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from process environment variables
    ///
    /// - `PORT` (default 3000)
    /// - `APP_NAME` (default "K8s Demo App")
    /// - `APP_VERSION` (default "1.0.0")
    /// - `SHUTDOWN_TIMEOUT_SECS` (default: unbounded drain)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let shutdown_timeout = match get("SHUTDOWN_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidShutdownTimeout(raw))?,
            )),
            None => None,
        };

        Ok(Self {
            port,
            app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            app_version: get("APP_VERSION").unwrap_or_else(|| DEFAULT_APP_VERSION.to_string()),
            shutdown_timeout,
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
