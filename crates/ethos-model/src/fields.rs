//! Field declarations.
//!
//! A model's declarations are normally an owned copy. [`SharedFields`] is the
//! opt-in alternative: the same map is visible to the model and to whoever
//! else holds the handle, so default changes made from outside show through
//! [`crate::Model::get`].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use ethos_storage::FieldMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::ModelError;

/// Declared field names and their default values.
#[derive(Debug, Clone)]
pub enum Fields {
    /// Declarations owned by the model.
    Owned(FieldMap),
    /// Declarations aliased with an external owner.
    Shared(SharedFields),
}

impl Fields {
    /// Build owned declarations from any struct that serializes to an object.
    ///
    /// # Errors
    ///
    /// `ModelError::Serialization` if `defaults` fails to serialize, and
    /// `ModelError::InvalidDeclaration` if it serializes to a non-object.
    pub fn from_serialize<T: Serialize>(defaults: &T) -> Result<Self, ModelError> {
        match serde_json::to_value(defaults)? {
            Value::Object(map) => Ok(Self::Owned(map)),
            other => Err(ModelError::InvalidDeclaration {
                found: json_type(&other),
            }),
        }
    }

    /// Wrap `fields` in a shared handle and return both.
    #[must_use]
    pub fn shared(fields: FieldMap) -> (Self, SharedFields) {
        let handle = SharedFields::new(fields);
        (Self::Shared(handle.clone()), handle)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        match self {
            Self::Owned(map) => map.contains_key(name),
            Self::Shared(shared) => shared.read().contains_key(name),
        }
    }

    pub(crate) fn default_of(&self, name: &str) -> Option<Value> {
        match self {
            Self::Owned(map) => map.get(name).cloned(),
            Self::Shared(shared) => shared.get(name),
        }
    }

    /// Copy of the current declarations.
    #[must_use]
    pub fn snapshot(&self) -> FieldMap {
        match self {
            Self::Owned(map) => map.clone(),
            Self::Shared(shared) => shared.snapshot(),
        }
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Owned(map) => map.len(),
            Self::Shared(shared) => shared.read().len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Fields {
    fn default() -> Self {
        Self::Owned(FieldMap::new())
    }
}

impl From<FieldMap> for Fields {
    fn from(map: FieldMap) -> Self {
        Self::Owned(map)
    }
}

impl From<SharedFields> for Fields {
    fn from(shared: SharedFields) -> Self {
        Self::Shared(shared)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Owned(
            iter.into_iter()
                .map(|(name, default)| (name.into(), default.into()))
                .collect(),
        )
    }
}

/// Handle to declarations shared between a model and an external owner.
///
/// The set of names is fixed at creation; only defaults of existing names
/// can change through the handle.
#[derive(Debug, Clone, Default)]
pub struct SharedFields(Arc<RwLock<FieldMap>>);

impl SharedFields {
    #[must_use]
    pub fn new(fields: FieldMap) -> Self {
        Self(Arc::new(RwLock::new(fields)))
    }

    /// Current default for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.read().get(name).cloned()
    }

    /// Replace the default of an existing field.
    ///
    /// Returns `false` and changes nothing when `name` is not declared.
    pub fn set_default(&self, name: &str, default: impl Into<Value>) -> bool {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        match guard.get_mut(name) {
            Some(slot) => {
                *slot = default.into();
                true
            }
            None => false,
        }
    }

    /// Copy of the shared declarations.
    #[must_use]
    pub fn snapshot(&self) -> FieldMap {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, FieldMap> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Serialize)]
    struct Article {
        title: String,
        views: u32,
        summary: Option<String>,
    }

    #[test]
    fn from_serialize_uses_struct_fields_as_defaults() {
        let fields = Fields::from_serialize(&Article {
            title: "untitled".into(),
            views: 0,
            summary: None,
        })
        .unwrap();

        assert_eq!(fields.len(), 3);
        assert!(fields.contains("summary"));
        assert_eq!(fields.default_of("title"), Some(json!("untitled")));
        assert_eq!(fields.default_of("summary"), Some(Value::Null));
    }

    #[test]
    fn from_serialize_rejects_non_objects() {
        let err = Fields::from_serialize(&vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, ModelError::InvalidDeclaration { found: "array" }));
    }

    #[test]
    fn collects_from_pairs() {
        let fields: Fields = [("test", Value::Null), ("count", json!(1))]
            .into_iter()
            .collect();
        assert_eq!(fields.len(), 2);
        assert!(!fields.is_empty());
        assert_eq!(fields.default_of("count"), Some(json!(1)));
        assert_eq!(fields.default_of("missing"), None);
    }

    #[test]
    fn shared_handle_changes_are_visible() {
        let mut map = FieldMap::new();
        map.insert("test".into(), Value::Null);
        let (fields, handle) = Fields::shared(map);

        assert!(handle.set_default("test", "changed"));
        assert_eq!(fields.default_of("test"), Some(json!("changed")));
    }

    #[test]
    fn shared_handle_cannot_add_names() {
        let (fields, handle) = Fields::shared(FieldMap::new());
        assert!(!handle.set_default("new", 1));
        assert!(!fields.contains("new"));
        assert!(fields.is_empty());
        assert!(handle.snapshot().is_empty());
    }
}
