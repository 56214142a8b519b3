//! Logging configuration and subscriber setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;

/// Environment variable that overrides [`LogConfig::filter`].
pub const LOG_ENV: &str = "ETHOS_LOG";

fn default_filter() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `"ethos_model=debug"`.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl LogConfig {
    /// Build the filter, preferring `ETHOS_LOG` when it parses.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` if the configured directive does not parse.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.filter).map_err(|e| ConfigError::InvalidValue {
            field: "log.filter".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Install a global fmt subscriber filtered by `config`.
///
/// # Errors
///
/// `ConfigError::InvalidValue` for a bad filter, `ConfigError::Tracing` if a
/// global subscriber is already set.
pub fn init_tracing(config: &LogConfig) -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .try_init()
        .map_err(|error| ConfigError::Tracing(error.to_string()))
}
