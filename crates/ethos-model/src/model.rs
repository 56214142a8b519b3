//! The field model and its builder.

use std::sync::Arc;

use ethos_options::{Options, OptionsError};
use ethos_storage::{FieldMap, StorageAdapter, StorageRegistry};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ModelError;
use crate::fields::Fields;
use crate::hooks::{DefaultHooks, FieldHooks};

/// Option naming the storage adapter identifier.
pub const STORAGE_OPTION: &str = "storage";

/// Option enabling errors on failed validation.
pub const STRICT_VALIDATION_OPTION: &str = "validation.strict";

/// A record with declared fields, an overlay of set values, and a storage
/// adapter to persist that overlay.
///
/// Reads fall back to the declared default while a field is unset. Writes go
/// through the required-field guard, then the hooks' `validate` and `filter`.
#[derive(Debug)]
pub struct Model<H = DefaultHooks> {
    fields: Fields,
    values: FieldMap,
    options: Options,
    hooks: H,
    registry: StorageRegistry,
    /// Adapter keyed by the identifier it was resolved under.
    storage: Option<(String, Arc<dyn StorageAdapter>)>,
}

impl Model {
    /// Model with default hooks, no option defaults and the default registry.
    #[must_use]
    pub fn new(fields: impl Into<Fields>, options: FieldMap) -> Self {
        ModelBuilder::new(fields).options(options).build()
    }

    /// Model whose declarations come from a serializable struct.
    ///
    /// # Errors
    ///
    /// See [`Fields::from_serialize`].
    pub fn from_defaults<T: Serialize>(defaults: &T, options: FieldMap) -> Result<Self, ModelError> {
        Ok(Self::new(Fields::from_serialize(defaults)?, options))
    }

    #[must_use]
    pub fn builder(fields: impl Into<Fields>) -> ModelBuilder {
        ModelBuilder::new(fields)
    }
}

impl<H: FieldHooks> Model<H> {
    /// Whether `field` is declared.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// Guard: fail unless `field` is declared.
    ///
    /// # Errors
    ///
    /// `ModelError::FieldNotFound` if `field` is not declared.
    pub fn require(&self, field: &str) -> Result<&Self, ModelError> {
        if self.has(field) {
            Ok(self)
        } else {
            Err(ModelError::field_not_found(field))
        }
    }

    /// Current value of `field`: the overlay value once set, else the default.
    ///
    /// # Errors
    ///
    /// `ModelError::FieldNotFound` if `field` is not declared.
    pub fn get(&self, field: &str) -> Result<Value, ModelError> {
        self.require(field)?;
        match self.values.get(field) {
            Some(value) if !value.is_null() => Ok(value.clone()),
            _ => self
                .fields
                .default_of(field)
                .ok_or_else(|| ModelError::field_not_found(field)),
        }
    }

    /// Run the validation hook. Does not require `field` to be declared.
    #[must_use]
    pub fn validate(&self, field: &str, value: &Value) -> bool {
        self.hooks.validate(field, value)
    }

    /// Run the filter hook. Does not require `field` to be declared.
    #[must_use]
    pub fn filter(&self, field: &str, value: Value) -> Value {
        self.hooks.filter(field, value)
    }

    /// Store the filtered `value` for `field`.
    ///
    /// A value that fails validation is dropped without changing anything,
    /// unless `validation.strict` is `true`.
    ///
    /// # Errors
    ///
    /// `ModelError::FieldNotFound` if `field` is not declared, and
    /// `ModelError::ValidationFailed` for a rejected value under strict validation.
    /// A rejected value with a non-boolean `validation.strict` is
    /// `ModelError::Option`.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<&mut Self, ModelError> {
        self.require(field)?;
        let value = value.into();

        if self.hooks.validate(field, &value) {
            let filtered = self.hooks.filter(field, value);
            self.values.insert(field.to_string(), filtered);
        } else if self.strict_validation()? {
            tracing::warn!(field, "value rejected by strict validation");
            return Err(ModelError::ValidationFailed {
                field: field.to_string(),
            });
        } else {
            tracing::debug!(field, "value failed validation, write skipped");
        }

        Ok(self)
    }

    /// Whether `field` is declared and holds a non-null overlay value.
    #[must_use]
    pub fn isset(&self, field: &str) -> bool {
        self.has(field) && self.values.get(field).is_some_and(|value| !value.is_null())
    }

    /// Drop the overlay value of `field`. Safe to repeat.
    pub fn unset(&mut self, field: &str) -> &mut Self {
        if self.isset(field) {
            self.values.remove(field);
        }
        self
    }

    /// Resolve a dotted option path.
    ///
    /// # Errors
    ///
    /// `ModelError::Option` if the path does not resolve.
    pub fn option(&self, path: &str) -> Result<&Value, ModelError> {
        Ok(self.options.get(path)?)
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// The overlay of explicitly set values.
    #[must_use]
    pub const fn values(&self) -> &FieldMap {
        &self.values
    }

    /// Copy of the field declarations.
    #[must_use]
    pub fn fields(&self) -> FieldMap {
        self.fields.snapshot()
    }

    #[must_use]
    pub const fn hooks(&self) -> &H {
        &self.hooks
    }

    /// The configured storage adapter, constructed on first use.
    ///
    /// The adapter is cached under the identifier it was resolved from; a new
    /// one is built only on first use or after the `storage` option changes.
    ///
    /// # Errors
    ///
    /// `ModelError::Option` if `storage` is missing or not a string, and
    /// `ModelError::StorageClassNotFound` if nothing is registered under it.
    pub fn storage(&mut self) -> Result<Arc<dyn StorageAdapter>, ModelError> {
        let kind = self.options.get_str(STORAGE_OPTION)?;

        if let Some((_, cached)) = self.storage.as_ref().filter(|(key, _)| key == kind) {
            tracing::debug!(kind, "reusing cached storage adapter");
            return Ok(Arc::clone(cached));
        }

        let adapter = self
            .registry
            .create(kind)
            .ok_or_else(|| ModelError::StorageClassNotFound {
                kind: kind.to_string(),
            })?;
        tracing::debug!(kind, "constructed storage adapter");

        self.storage = Some((kind.to_string(), Arc::clone(&adapter)));
        Ok(adapter)
    }

    /// Hand the overlay to the storage adapter.
    ///
    /// # Errors
    ///
    /// Storage resolution errors from [`Model::storage`], and
    /// `ModelError::Storage` if the adapter fails.
    pub fn save(&mut self) -> Result<&mut Self, ModelError> {
        let storage = self.storage()?;
        tracing::trace!(kind = storage.kind(), fields = self.values.len(), "saving overlay");
        storage.save(&self.values)?;
        Ok(self)
    }

    /// Run the `load` hook. The default hook does nothing.
    ///
    /// Names the hook adds for undeclared fields are dropped afterwards.
    ///
    /// # Errors
    ///
    /// Whatever the hook returns.
    pub fn load(&mut self) -> Result<&mut Self, ModelError> {
        self.hooks.load(&mut self.values)?;
        let fields = &self.fields;
        self.values.retain(|field, _| {
            let declared = fields.contains(field);
            if !declared {
                tracing::debug!(
                    field = field.as_str(),
                    "load hook wrote an undeclared field, dropped"
                );
            }
            declared
        });
        Ok(self)
    }

    /// Pull persisted values from the storage adapter into the overlay.
    ///
    /// Entries for undeclared fields are ignored. Persisted values go through
    /// `validate` and `filter` like [`Model::set`]; rejected ones are skipped.
    ///
    /// # Errors
    ///
    /// Storage resolution errors from [`Model::storage`], and
    /// `ModelError::Storage` if the adapter fails.
    pub fn load_from_storage(&mut self) -> Result<&mut Self, ModelError> {
        let storage = self.storage()?;
        let mut loaded = FieldMap::new();
        storage.load(&mut loaded)?;
        tracing::trace!(kind = storage.kind(), fields = loaded.len(), "loaded overlay");

        for (field, value) in loaded {
            if !self.has(&field) {
                continue;
            }
            if self.hooks.validate(&field, &value) {
                let filtered = self.hooks.filter(&field, value);
                self.values.insert(field, filtered);
            } else {
                tracing::debug!(
                    field = field.as_str(),
                    "persisted value failed validation, skipped"
                );
            }
        }
        Ok(self)
    }

    /// Declared defaults with every set value applied.
    #[must_use]
    pub fn to_record(&self) -> FieldMap {
        let mut record = self.fields.snapshot();
        for (field, value) in &self.values {
            if !value.is_null() && record.contains_key(field) {
                record.insert(field.clone(), value.clone());
            }
        }
        record
    }

    /// Deserialize [`Model::to_record`] into `T`.
    ///
    /// # Errors
    ///
    /// `ModelError::Serialization` if the record does not fit `T`.
    pub fn hydrate<T: DeserializeOwned>(&self) -> Result<T, ModelError> {
        Ok(serde_json::from_value(Value::Object(self.to_record()))?)
    }

    fn strict_validation(&self) -> Result<bool, ModelError> {
        match self.options.get_as::<bool>(STRICT_VALIDATION_OPTION) {
            Ok(strict) => Ok(strict),
            Err(OptionsError::NotFound { .. }) => Ok(false),
            Err(err) => {
                tracing::warn!(%err, "validation.strict is not a boolean");
                Err(err.into())
            }
        }
    }
}

/// Construction surface for [`Model`].
#[derive(Debug)]
pub struct ModelBuilder<H = DefaultHooks> {
    fields: Fields,
    options: FieldMap,
    defaults: FieldMap,
    hooks: H,
    registry: StorageRegistry,
    storage: Option<Arc<dyn StorageAdapter>>,
}

impl ModelBuilder {
    #[must_use]
    pub fn new(fields: impl Into<Fields>) -> Self {
        Self {
            fields: fields.into(),
            options: FieldMap::new(),
            defaults: FieldMap::new(),
            hooks: DefaultHooks,
            registry: StorageRegistry::default(),
            storage: None,
        }
    }
}

impl<H: FieldHooks> ModelBuilder<H> {
    /// Caller options, layered over [`ModelBuilder::defaults`].
    #[must_use]
    pub fn options(mut self, options: FieldMap) -> Self {
        self.options = options;
        self
    }

    /// Set a single top-level option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Option defaults.
    #[must_use]
    pub fn defaults(mut self, defaults: FieldMap) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replace the hooks.
    #[must_use]
    pub fn hooks<H2: FieldHooks>(self, hooks: H2) -> ModelBuilder<H2> {
        ModelBuilder {
            fields: self.fields,
            options: self.options,
            defaults: self.defaults,
            hooks,
            registry: self.registry,
            storage: self.storage,
        }
    }

    /// Registry used to resolve the `storage` option.
    #[must_use]
    pub fn registry(mut self, registry: StorageRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use this adapter instance. The `storage` option is set to its identifier.
    #[must_use]
    pub fn storage(mut self, adapter: Arc<dyn StorageAdapter>) -> Self {
        self.storage = Some(adapter);
        self
    }

    #[must_use]
    pub fn build(self) -> Model<H> {
        let mut options = self.options;
        let storage = self.storage.map(|adapter| {
            let kind = adapter.kind().to_string();
            options.insert(STORAGE_OPTION.to_string(), Value::from(kind.as_str()));
            (kind, adapter)
        });

        Model {
            fields: self.fields,
            values: FieldMap::new(),
            options: Options::new(options, self.defaults),
            hooks: self.hooks,
            registry: self.registry,
            storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethos_storage::MemoryStorage;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn map(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    fn fixture() -> Model {
        Model::new(map(json!({ "test": null })), FieldMap::new())
    }

    #[rstest]
    #[case::empty_name("", false)]
    #[case::extant_field("test", true)]
    #[case::non_existent_field("foobar", false)]
    fn has_and_require(#[case] field: &str, #[case] expected: bool) {
        let model = fixture();
        assert_eq!(model.has(field), expected);
        match model.require(field) {
            Ok(chained) => {
                assert!(expected);
                assert!(std::ptr::eq(chained, &model));
            }
            Err(err) => {
                assert!(!expected);
                assert!(matches!(err, ModelError::FieldNotFound { field: f } if f == field));
            }
        }
    }

    #[rstest]
    #[case::valid_field_null_value("test", true, Value::Null)]
    #[case::valid_field_non_null_value("test", true, json!("value"))]
    #[case::invalid_field_null_value("foobar", false, Value::Null)]
    #[case::invalid_field_non_null_value("foobar", false, json!("value"))]
    fn set_stores_value_for_declared_fields(
        #[case] field: &str,
        #[case] valid_field: bool,
        #[case] value: Value,
    ) {
        let mut model = fixture();
        let result = model.set(field, value.clone()).map(|_| ());

        if valid_field {
            assert!(result.is_ok());
            assert_eq!(model.values().get(field), Some(&value));
        } else {
            assert!(matches!(result, Err(ModelError::FieldNotFound { .. })));
            assert!(model.values().is_empty());
        }
    }

    #[test]
    fn get_prefers_overlay_then_default() {
        let mut model = Model::new(map(json!({ "test": "default" })), FieldMap::new());
        assert_eq!(model.get("test").unwrap(), json!("default"));

        model.set("test", "value").unwrap();
        assert_eq!(model.get("test").unwrap(), json!("value"));

        model.unset("test");
        assert_eq!(model.get("test").unwrap(), json!("default"));
    }

    #[test]
    fn get_undeclared_field_fails() {
        let model = fixture();
        assert!(matches!(
            model.get("foobar"),
            Err(ModelError::FieldNotFound { field }) if field == "foobar"
        ));
    }

    #[test]
    fn null_overlay_entries_are_not_set() {
        let mut model = Model::new(map(json!({ "test": "default" })), FieldMap::new());
        model.set("test", Value::Null).unwrap();

        assert!(!model.isset("test"));
        assert_eq!(model.values().get("test"), Some(&Value::Null));
        assert_eq!(model.get("test").unwrap(), json!("default"));
    }

    #[test]
    fn isset_and_unset_twice() {
        let mut model = fixture();
        assert!(!model.isset("test"));
        assert!(!model.isset("foobar"));

        model.set("test", "value").unwrap();
        assert!(model.isset("test"));

        model.unset("test").unset("test");
        assert!(!model.isset("test"));
        assert!(model.values().is_empty());

        model.unset("foobar");
        assert!(!model.isset("foobar"));
    }

    #[test]
    fn set_chains() {
        let mut model = Model::new(map(json!({ "a": 0, "b": 0 })), FieldMap::new());
        model.set("a", 1).unwrap().set("b", 2).unwrap();
        assert_eq!(model.to_record(), map(json!({ "a": 1, "b": 2 })));
    }

    #[test]
    fn empty_declaration_has_no_fields() {
        let mut model = Model::new(FieldMap::new(), FieldMap::new());
        assert!(!model.has("anything"));
        assert!(model.set("anything", 1).is_err());
        assert!(model.fields().is_empty());
    }

    #[test]
    fn injected_storage_sets_option_to_its_kind() {
        let storage = Arc::new(MemoryStorage::new());
        let model = Model::builder(map(json!({ "test": null })))
            .storage(storage)
            .build();
        assert_eq!(model.option("storage").unwrap(), "memory");
    }

    #[test]
    fn storage_requires_the_option() {
        let mut model = fixture();
        assert!(matches!(model.storage(), Err(ModelError::Option(_))));
    }

    #[test]
    fn unknown_storage_kind_is_not_found() {
        let mut model = Model::builder(map(json!({ "test": null })))
            .option("storage", "bogus")
            .build();
        assert!(matches!(
            model.storage(),
            Err(ModelError::StorageClassNotFound { kind }) if kind == "bogus"
        ));
    }

    #[test]
    fn load_is_noop_by_default() {
        let mut model = fixture();
        model.set("test", "value").unwrap();
        model.load().unwrap();
        assert_eq!(model.values(), &map(json!({ "test": "value" })));
    }

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Record {
        test: Option<String>,
    }

    #[test]
    fn hydrate_applies_overlay_to_defaults() {
        let mut model = fixture();
        assert_eq!(model.hydrate::<Record>().unwrap(), Record { test: None });

        model.set("test", "value").unwrap();
        assert_eq!(
            model.hydrate::<Record>().unwrap(),
            Record {
                test: Some("value".into())
            }
        );
    }
}
