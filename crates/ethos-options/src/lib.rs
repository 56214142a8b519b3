//! # ethos-options
//!
//! Read-only option bags with dotted-path lookup.
//!
//! An [`Options`] instance is built from caller-supplied values layered over a
//! set of defaults. The merge is shallow: each top-level key supplied by the
//! caller replaces the default wholesale, nested objects included.
//!
//! Paths use `.` to descend into nested objects, so `"nested.option"` reads
//! `values["nested"]["option"]`. There is no escape syntax, which means a key
//! that itself contains a `.` cannot be addressed.
//!
//! # Usage
//!
//! ```
//! use ethos_options::Options;
//! use serde_json::json;
//!
//! let defaults = json!({ "option": "value", "nested": { "option": "value" } });
//! let options = Options::from_values(json!({}), defaults).unwrap();
//!
//! assert_eq!(options.get("nested.option").unwrap(), "value");
//! assert!(!options.has("missing"));
//! ```

mod error;

pub use error::OptionsError;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator between nested segments of an option path.
pub const PATH_SEPARATOR: char = '.';

/// Immutable option bag resolved by dotted path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    merged: Map<String, Value>,
}

impl Options {
    /// Layer `values` over `defaults`, replacing defaults per top-level key.
    #[must_use]
    pub fn new(values: Map<String, Value>, defaults: Map<String, Value>) -> Self {
        let mut merged = defaults;
        merged.extend(values);
        Self { merged }
    }

    /// Same as [`Options::new`], from arbitrary JSON values.
    ///
    /// `null` on either side is treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::InvalidType` if either side is neither an object
    /// nor `null`.
    pub fn from_values(values: Value, defaults: Value) -> Result<Self, OptionsError> {
        Ok(Self::new(into_map(values, "values")?, into_map(defaults, "defaults")?))
    }

    /// Resolve a dotted `path` against the merged options.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::NotFound` if any segment is missing, or if an
    /// intermediate segment resolves to something other than an object.
    pub fn get(&self, path: &str) -> Result<&Value, OptionsError> {
        let mut segments = path.split(PATH_SEPARATOR);
        let not_found = || OptionsError::NotFound {
            path: path.to_string(),
        };

        let first = segments.next().ok_or_else(not_found)?;
        let mut current = self.merged.get(first).ok_or_else(not_found)?;

        for segment in segments {
            current = current
                .as_object()
                .and_then(|level| level.get(segment))
                .ok_or_else(not_found)?;
        }

        Ok(current)
    }

    /// Whether [`Options::get`] would succeed for `path`.
    #[must_use]
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Resolve `path` and require it to be a string.
    ///
    /// # Errors
    ///
    /// `OptionsError::NotFound` if the path is missing, `OptionsError::InvalidType`
    /// if the value is not a string.
    pub fn get_str(&self, path: &str) -> Result<&str, OptionsError> {
        self.get(path)?
            .as_str()
            .ok_or_else(|| OptionsError::InvalidType {
                path: path.to_string(),
                expected: "string",
            })
    }

    /// Resolve `path` and deserialize it into `T`.
    ///
    /// # Errors
    ///
    /// `OptionsError::NotFound` if the path is missing, `OptionsError::InvalidType`
    /// if the value does not deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, OptionsError> {
        let value = self.get(path)?.clone();
        serde_json::from_value(value).map_err(|_| OptionsError::InvalidType {
            path: path.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// The merged top-level mapping.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.merged
    }
}

fn into_map(value: Value, side: &'static str) -> Result<Map<String, Value>, OptionsError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(OptionsError::InvalidType {
            path: side.to_string(),
            expected: "object",
        }),
    }
}
