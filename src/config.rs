//! Configuration Module
//!
//! Handles loading cache engine configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_REAPER_INTERVAL_MS;

/// Cache engine configuration parameters.
///
/// Values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interval in milliseconds between two reaper sweeps
    pub reaper_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REAPER_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        Self {
            reaper_interval_ms: env::var("REAPER_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REAPER_INTERVAL_MS),
        }
    }

    /// Returns the reaper interval as a Duration.
    pub fn reaper_interval(&self) -> Duration {
        Duration::from_millis(self.reaper_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reaper_interval_ms: DEFAULT_REAPER_INTERVAL_MS,
        }
    }
}
