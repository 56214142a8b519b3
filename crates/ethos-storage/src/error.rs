//! Storage adapter error types.

use thiserror::Error;

/// Errors raised by storage adapters.
///
/// Failure semantics beyond these variants are adapter-defined.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store rejected the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
