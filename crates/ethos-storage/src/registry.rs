//! Adapter lookup by identifier.
//!
//! The registry replaces "instantiate the class named in configuration": a
//! model's `storage` option names an identifier, and the registry maps that
//! identifier to a factory producing a fresh adapter.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{MemoryStorage, StorageAdapter};

/// Constructor for a storage adapter.
pub type StorageFactory = Arc<dyn Fn() -> Arc<dyn StorageAdapter> + Send + Sync>;

/// Map of adapter identifiers to factories.
#[derive(Clone)]
pub struct StorageRegistry {
    factories: BTreeMap<String, StorageFactory>,
}

impl StorageRegistry {
    /// A registry with no adapters at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register `factory` under `kind`, replacing any previous registration.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn StorageAdapter> + Send + Sync + 'static,
    {
        let kind = kind.into();
        tracing::debug!(%kind, "registering storage adapter");
        self.factories.insert(kind, Arc::new(factory));
        self
    }

    /// Whether an adapter is registered under `kind`.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Construct a new adapter registered under `kind`.
    ///
    /// Returns `None` when nothing is registered under that identifier.
    #[must_use]
    pub fn create(&self, kind: &str) -> Option<Arc<dyn StorageAdapter>> {
        self.factories.get(kind).map(|factory| factory())
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

impl Default for StorageRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(MemoryStorage::KIND, || Arc::new(MemoryStorage::new()));
        registry
    }
}

impl fmt::Debug for StorageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
