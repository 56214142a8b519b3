//! Model error types.

use ethos_options::OptionsError;
use ethos_storage::StorageError;
use thiserror::Error;

/// Errors from model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The field is not part of the model's declarations.
    #[error("Field not found: {field}")]
    FieldNotFound { field: String },

    /// The configured storage identifier has no adapter behind it.
    #[error("Storage adapter not found: {kind}")]
    StorageClassNotFound { kind: String },

    /// A value failed validation while strict validation is enabled.
    #[error("Validation failed for field '{field}'")]
    ValidationFailed { field: String },

    /// A field sub-schema could not be compiled.
    #[error("Invalid schema for field '{field}': {reason}")]
    InvalidSchema { field: String, reason: String },

    /// Field declarations did not serialize to an object.
    #[error("Field declarations must be an object, got {found}")]
    InvalidDeclaration { found: &'static str },

    /// Option lookup failed.
    #[error(transparent)]
    Option(#[from] OptionsError),

    /// The storage adapter reported a failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Conversion between typed structs and field maps failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn field_not_found(field: &str) -> Self {
        Self::FieldNotFound {
            field: field.to_string(),
        }
    }
}
