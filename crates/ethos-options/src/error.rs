//! Option resolution error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    /// A segment of the dotted path does not exist at its level.
    #[error("Option not found: {path}")]
    NotFound { path: String },

    /// The option resolved but does not have the requested shape.
    #[error("Option '{path}' is not a valid {expected}")]
    InvalidType { path: String, expected: &'static str },
}
