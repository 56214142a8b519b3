//! # ethos-config
//!
//! Layered configuration loading for Ethos using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ETHOS_*` prefix, `__` as separator)
//! 2. Project-level `.ethos/config.toml`
//! 3. User-level `~/.config/ethos/config.toml`
//! 4. Built-in defaults
//!
//! `ETHOS_STORAGE__ADAPTER` maps to `storage.adapter`,
//! `ETHOS_MODEL__STRICT_VALIDATION` to `model.strict_validation`.
//!
//! The loaded configuration feeds models through [`EthosConfig::model_defaults`],
//! which renders it as option defaults.

mod error;
mod log;
mod model;
mod storage;

pub use error::ConfigError;
pub use log::{LOG_ENV, LogConfig, init_tracing};
pub use model::ModelConfig;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EthosConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl EthosConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy`; use [`EthosConfig::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// `ConfigError::Figment` if a source fails to parse or extract, and
    /// `ConfigError::InvalidValue` if [`EthosConfig::validate`] rejects the result.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the working directory first, then [`EthosConfig::load`].
    ///
    /// # Errors
    ///
    /// Same as [`EthosConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".ethos/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("ETHOS_").split("__"))
    }

    /// Reject values that would make every model fail at first use.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` if `storage.adapter` is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.adapter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.adapter".to_string(),
                reason: "adapter identifier must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Option defaults for a model: `storage` and `validation.strict`.
    #[must_use]
    pub fn model_defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        defaults.insert(
            "storage".to_string(),
            Value::String(self.storage.adapter.clone()),
        );
        defaults.insert(
            "validation".to_string(),
            json!({ "strict": self.model.strict_validation }),
        );
        defaults
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ethos").join("config.toml"))
    }
}
