//! JSON Schema backed validation hooks.
//!
//! Each declared property of an object schema becomes the validation rule for
//! the field of the same name. Fields the schema does not describe always pass.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::hooks::FieldHooks;

/// Validates field values against the `properties` of a JSON Schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaHooks {
    properties: BTreeMap<String, Value>,
}

impl SchemaHooks {
    /// Build hooks from an object schema.
    ///
    /// The dialect and shared definitions (`$schema`, `$defs`, `definitions`)
    /// are copied into every property schema so `$ref`s keep resolving.
    ///
    /// # Errors
    ///
    /// `ModelError::InvalidSchema` if a property schema does not compile.
    pub fn new(schema: &Value) -> Result<Self, ModelError> {
        let Some(props) = schema.get("properties").and_then(Value::as_object) else {
            return Ok(Self::default());
        };

        let mut properties = BTreeMap::new();
        for (field, property) in props {
            let property = with_definitions(property, schema);
            jsonschema::validator_for(&property).map_err(|e| ModelError::InvalidSchema {
                field: field.clone(),
                reason: format!("{e}"),
            })?;
            properties.insert(field.clone(), property);
        }

        Ok(Self { properties })
    }

    /// Build hooks from the schema `schemars` derives for `T`.
    ///
    /// # Errors
    ///
    /// `ModelError::Serialization` if the generated schema cannot be converted,
    /// `ModelError::InvalidSchema` if a property schema does not compile.
    pub fn for_type<T: JsonSchema>() -> Result<Self, ModelError> {
        let schema = serde_json::to_value(schemars::schema_for!(T))?;
        Self::new(&schema)
    }

    /// Whether `field` has a validation rule.
    #[must_use]
    pub fn covers(&self, field: &str) -> bool {
        self.properties.contains_key(field)
    }
}

impl FieldHooks for SchemaHooks {
    fn validate(&self, field: &str, value: &Value) -> bool {
        let Some(schema) = self.properties.get(field) else {
            return true;
        };

        match jsonschema::validator_for(schema) {
            Ok(validator) => validator.is_valid(value),
            Err(e) => {
                tracing::warn!(field, "schema failed to compile: {e}");
                false
            }
        }
    }
}

fn with_definitions(property: &Value, root: &Value) -> Value {
    let Value::Object(map) = property else {
        return property.clone();
    };

    let mut map: Map<String, Value> = map.clone();
    for key in ["$schema", "$defs", "definitions"] {
        if let Some(defs) = root.get(key) {
            map.entry(key).or_insert_with(|| defs.clone());
        }
    }
    Value::Object(map)
}
