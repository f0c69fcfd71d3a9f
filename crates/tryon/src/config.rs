use std::time::Duration;

use closetly_core::config::{env_or, ConfigError};

/// Default delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Default number of status polls before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Poll policy for a try-on job.
///
/// The budget is a count of polls, not a deadline: with slow responses the
/// total wait exceeds [`max_wait`](Self::max_wait).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed delay before each status poll (no backoff).
    pub poll_interval: Duration,
    /// Upper bound on status polls per job.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollConfig {
    /// Load the poll policy from environment variables with defaults.
    ///
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `TRYON_POLL_INTERVAL_MS` | `2000`  |
    /// | `TRYON_MAX_ATTEMPTS`     | `30`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let interval_ms: u64 = env_or(
            "TRYON_POLL_INTERVAL_MS",
            DEFAULT_POLL_INTERVAL.as_millis() as u64,
            "u64",
        )?;
        let max_attempts: u32 = env_or("TRYON_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS, "u32")?;

        let config = Self {
            poll_interval: Duration::from_millis(interval_ms),
            max_attempts,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::OutOfRange {
                var: "TRYON_POLL_INTERVAL_MS",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::OutOfRange {
                var: "TRYON_MAX_ATTEMPTS",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Nominal wait before a job times out (`max_attempts × poll_interval`).
    pub fn max_wait(&self) -> Duration {
        self.poll_interval * self.max_attempts
    }
}
