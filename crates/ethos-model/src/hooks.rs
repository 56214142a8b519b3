//! Extension points consulted by [`crate::Model`].

use std::fmt::Debug;

use ethos_storage::FieldMap;
use serde_json::Value;

use crate::error::ModelError;

/// Per-model validation, filtering and loading behaviour.
///
/// `validate` and `filter` receive any field name, declared or not, so they
/// can be reused for ad hoc values.
pub trait FieldHooks: Send + Sync + Debug {
    /// Whether `value` is acceptable for `field`.
    fn validate(&self, _field: &str, _value: &Value) -> bool {
        true
    }

    /// Transform `value` before it is stored for `field`.
    fn filter(&self, _field: &str, value: Value) -> Value {
        value
    }

    /// Refresh the overlay. Called by [`crate::Model::load`].
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn load(&self, _values: &mut FieldMap) -> Result<(), ModelError> {
        Ok(())
    }
}

/// Accept everything, change nothing, load nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl FieldHooks for DefaultHooks {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::declared_null("test", Value::Null)]
    #[case::declared_value("test", json!("value"))]
    #[case::undeclared_null("foobar", Value::Null)]
    #[case::undeclared_value("foobar", json!("value"))]
    fn defaults_accept_and_pass_through(#[case] field: &str, #[case] value: Value) {
        let hooks = DefaultHooks;
        assert!(hooks.validate(field, &value));
        assert_eq!(hooks.filter(field, value.clone()), value);
    }

    #[test]
    fn default_load_leaves_values_alone() {
        let mut values = FieldMap::new();
        values.insert("test".into(), json!("value"));
        DefaultHooks.load(&mut values).unwrap();
        assert_eq!(values.get("test"), Some(&json!("value")));
    }
}
