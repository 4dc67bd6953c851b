//! Import organization configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImportsConfig {
    /// Drop imports whose package is no longer referenced. Default: true.
    pub drop_unused: Option<bool>,
    /// Add standard-library imports for unresolved package qualifiers. Default: true.
    pub add_missing: Option<bool>,
}

impl ImportsConfig {
    pub fn effective_drop_unused(&self) -> bool {
        self.drop_unused.unwrap_or(true)
    }

    pub fn effective_add_missing(&self) -> bool {
        self.add_missing.unwrap_or(true)
    }
}
