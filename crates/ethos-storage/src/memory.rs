//! In-memory recording adapter.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{FieldMap, StorageAdapter, StorageError};

/// Adapter that keeps every saved overlay in memory, in call order.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saves: Mutex<Vec<FieldMap>>,
}

impl MemoryStorage {
    /// Identifier of this adapter in a [`crate::StorageRegistry`].
    pub const KIND: &'static str = "memory";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record passed to `save`, oldest first.
    #[must_use]
    pub fn saves(&self) -> Vec<FieldMap> {
        self.lock().clone()
    }

    /// Number of `save` calls so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().len()
    }

    /// The most recently saved record.
    #[must_use]
    pub fn last_saved(&self) -> Option<FieldMap> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<FieldMap>> {
        self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageAdapter for MemoryStorage {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn save(&self, data: &FieldMap) -> Result<(), StorageError> {
        tracing::trace!(fields = data.len(), "memory storage: save");
        self.lock().push(data.clone());
        Ok(())
    }

    fn load(&self, data: &mut FieldMap) -> Result<(), StorageError> {
        if let Some(last) = self.lock().last() {
            tracing::trace!(fields = last.len(), "memory storage: load");
            data.extend(last.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Ok(())
    }
}
