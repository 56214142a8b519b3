//! # ethos-storage
//!
//! The persistence seam for Ethos models.
//!
//! A model never talks to a backend directly: it hands its overlay of set
//! values to a [`StorageAdapter`]. Adapters are looked up by a string
//! identifier through a [`StorageRegistry`], which keeps model configuration
//! plain data instead of live objects.
//!
//! [`MemoryStorage`] is the in-process adapter. It records every save and is
//! registered under `"memory"` in the default registry.

mod error;
mod memory;
mod registry;

pub use error::StorageError;
pub use memory::MemoryStorage;
pub use registry::{StorageFactory, StorageRegistry};

use std::fmt::Debug;

/// Field name to value mapping exchanged with adapters.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Contract every storage backend implements.
///
/// Methods take `&self` so an adapter can be shared between its configuring
/// owner and the models using it; implementations bring their own interior
/// mutability.
pub trait StorageAdapter: Send + Sync + Debug {
    /// Identifier this adapter is registered and configured under.
    fn kind(&self) -> &str;

    /// Persist the given overlay.
    ///
    /// # Errors
    ///
    /// Adapter-defined.
    fn save(&self, data: &FieldMap) -> Result<(), StorageError>;

    /// Populate `data` from persisted state.
    ///
    /// # Errors
    ///
    /// Adapter-defined.
    fn load(&self, data: &mut FieldMap) -> Result<(), StorageError>;
}
