use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Polling and scheduling parameters for a fan-out pass
///
/// ```toml
/// [tracker]
/// base_frequency_minutes = 5
/// bootstrap_limit = 5
/// fetch_concurrency = 4
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TrackerConfig {
    /// Re-poll interval for a query with a single active watcher.
    ///
    /// Every additional active watcher shortens the interval by one minute,
    /// never below one minute.
    #[serde(default = "default_base_frequency_minutes")]
    pub base_frequency_minutes: u64,

    /// How many of the most recent results a never-polled query delivers.
    #[serde(default = "default_bootstrap_limit")]
    pub bootstrap_limit: usize,

    /// Number of tracked queries fetched concurrently within one pass.
    /// 1 keeps the pass a plain sequential loop.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Upper bound for a single search-source call (milliseconds)
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Upper bound for a single delivery call (milliseconds)
    #[serde(default = "default_delivery_timeout_ms")]
    pub delivery_timeout_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_frequency_minutes: default_base_frequency_minutes(),
            bootstrap_limit: default_bootstrap_limit(),
            fetch_concurrency: default_fetch_concurrency(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            delivery_timeout_ms: default_delivery_timeout_ms(),
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_frequency_minutes < 1 {
            return Err(Error::Config(ConfigError::Message(
                "base_frequency_minutes must be at least 1".into(),
            )));
        }

        if self.bootstrap_limit < 1 {
            return Err(Error::Config(ConfigError::Message(
                "bootstrap_limit must be at least 1".into(),
            )));
        }

        if self.fetch_concurrency < 1 {
            return Err(Error::Config(ConfigError::Message(
                "fetch_concurrency must be at least 1".into(),
            )));
        }

        if self.fetch_timeout_ms < 1 || self.delivery_timeout_ms < 1 {
            return Err(Error::Config(ConfigError::Message(format!(
                "timeouts must be at least 1ms, got fetch={} delivery={}",
                self.fetch_timeout_ms, self.delivery_timeout_ms
            ))));
        }

        Ok(())
    }
}

fn default_base_frequency_minutes() -> u64 {
    5
}
fn default_bootstrap_limit() -> usize {
    5
}
fn default_fetch_concurrency() -> usize {
    1
}
// in ms
fn default_fetch_timeout_ms() -> u64 {
    30_000
}
// in ms
fn default_delivery_timeout_ms() -> u64 {
    10_000
}
