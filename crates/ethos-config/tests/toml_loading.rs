//! Integration tests for layered configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use ethos_config::{ConfigError, EthosConfig};
use ethos_model::{Model, ModelError};
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
adapter = "archive"

[model]
strict_validation = true

[log]
filter = "ethos_model=debug"
"#,
        )?;

        let config: EthosConfig = Figment::from(Serialized::defaults(EthosConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.storage.adapter, "archive");
        assert!(config.model.strict_validation);
        assert_eq!(config.log.filter, "ethos_model=debug");
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up() {
    Jail::expect_with(|jail| {
        std::fs::create_dir(".ethos").map_err(|e| e.to_string())?;
        jail.create_file(
            ".ethos/config.toml",
            r#"
[model]
strict_validation = true
"#,
        )?;

        let config = EthosConfig::load().expect("config should load");
        assert!(config.model.strict_validation);
        assert_eq!(config.storage.adapter, "memory");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[storage]\nadapter = \"from-toml\"\n")?;
        jail.set_env("ETHOS_STORAGE__ADAPTER", "from-env");

        let config: EthosConfig = Figment::from(Serialized::defaults(EthosConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("ETHOS_").split("__"))
            .extract()?;

        assert_eq!(config.storage.adapter, "from-env");
        Ok(())
    });
}

#[test]
fn blank_adapter_fails_load() {
    Jail::expect_with(|jail| {
        jail.set_env("ETHOS_STORAGE__ADAPTER", "\"\"");

        let err = EthosConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "storage.adapter"));
        Ok(())
    });
}

#[test]
fn model_defaults_drive_models() {
    Jail::expect_with(|jail| {
        jail.set_env("ETHOS_MODEL__STRICT_VALIDATION", "true");
        let config = EthosConfig::load().expect("config should load");

        let mut model = Model::builder(json!({ "test": null }).as_object().cloned().unwrap())
            .defaults(config.model_defaults())
            .build();

        assert_eq!(model.option("validation.strict").unwrap(), &json!(true));
        assert_eq!(model.storage().expect("memory adapter").kind(), "memory");
        assert!(matches!(
            model.set("missing", 1),
            Err(ModelError::FieldNotFound { .. })
        ));
        Ok(())
    });
}
