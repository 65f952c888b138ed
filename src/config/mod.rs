//! Configuration management for the tracking engine.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support
//! - Environment variable overrides
//! - Component-wise validation
mod render;
mod tracker;
pub use render::*;
pub use tracker::*;

use std::env;
use std::fmt::Debug;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Prefix for environment overrides, e.g. `TRACK__TRACKER__BASE_FREQUENCY_MINUTES=3`.
pub const ENV_PREFIX: &str = "TRACK";

/// Main configuration container for the tracking engine
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct TrackerSettings {
    /// Polling, scheduling and concurrency parameters
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Notification body rendering
    #[serde(default)]
    pub render: RenderConfig,
}

impl Debug for TrackerSettings {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("TrackerSettings")
            .field("tracker", &self.tracker)
            .field("render", &self.render)
            .finish()
    }
}

impl TrackerSettings {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Configuration sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `TRACK__` prefix (highest priority)
    ///
    /// Callers must call `validate()` before handing the settings to a tracker.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("CONFIG_PATH", "config/tracker.toml");
    /// std::env::set_var("TRACK__TRACKER__BASE_FREQUENCY_MINUTES", "3");
    /// let settings = TrackerSettings::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let settings: Self = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let settings: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        self.tracker.validate()?;
        self.render.validate()?;
        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
