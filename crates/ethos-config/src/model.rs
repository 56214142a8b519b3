//! Model behaviour settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Turn failed validation on `set` into an error instead of a silent skip.
    #[serde(default)]
    pub strict_validation: bool,
}
