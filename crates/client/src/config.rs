use std::time::Duration;

use closetly_core::config::{env_or, ConfigError};

/// Backend connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (default: `http://localhost:8000`).
    pub base_url: String,
    /// Per-request HTTP timeout in seconds (default: `15`).
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 15,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `BASE_URL`             | `http://localhost:8000` |
    /// | `REQUEST_TIMEOUT_SECS` | `15`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_url = std::env::var("BASE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.base_url);

        let request_timeout_secs: u64 =
            env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs, "u64")?;
        if request_timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                var: "REQUEST_TIMEOUT_SECS",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            base_url,
            request_timeout_secs,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
