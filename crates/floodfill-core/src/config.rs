//! Flood fill configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of nodes visited concurrently.
pub const DEFAULT_PARALLELISM: usize = 4;

/// Default number of completed claims between progress events.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 256;

/// Configuration for a flood fill run.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct FillConfig {
    /// Maximum number of visit/neighbor pairs running at once.
    #[builder(default = "DEFAULT_PARALLELISM")]
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Emit a progress event every this many claims (0 = only at the end).
    #[builder(default = "DEFAULT_PROGRESS_INTERVAL")]
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_parallelism() -> usize {
    DEFAULT_PARALLELISM
}

fn default_progress_interval() -> u64 {
    DEFAULT_PROGRESS_INTERVAL
}

impl FillConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.parallelism == Some(0) {
            return Err(ConfigError::InvalidParallelism { value: 0 }.to_string());
        }
        Ok(())
    }
}

impl FillConfig {
    /// Create a new config builder.
    pub fn builder() -> FillConfigBuilder {
        FillConfigBuilder::default()
    }

    /// Create a config with the given parallelism and default settings.
    ///
    /// Fails fast on a parallelism of zero.
    pub fn new(parallelism: usize) -> Result<Self, ConfigError> {
        let config = Self {
            parallelism,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Check a config that was built by hand or deserialized.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parallelism == 0 {
            return Err(ConfigError::InvalidParallelism {
                value: self.parallelism,
            });
        }
        Ok(())
    }
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}
