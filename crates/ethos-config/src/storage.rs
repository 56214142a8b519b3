//! Storage adapter selection.

use serde::{Deserialize, Serialize};

fn default_adapter() -> String {
    "memory".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Identifier of the adapter models resolve when none is injected.
    #[serde(default = "default_adapter")]
    pub adapter: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            adapter: default_adapter(),
        }
    }
}
