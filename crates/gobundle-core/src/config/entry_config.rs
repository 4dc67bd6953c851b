//! Entry-point configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ENTRY_FUNCTION, DEFAULT_ENTRY_METHOD};

/// Configuration for entry-point synthesis.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EntryConfig {
    /// Receiver-bound method that starts the program. Default: "Solve".
    pub method: Option<String>,
    /// Name of the synthesized entry function. Default: "main".
    pub function: Option<String>,
    /// Fail when no entry method exists. Default: true.
    pub required: Option<bool>,
}

impl EntryConfig {
    /// Returns the effective entry method, defaulting to "Solve".
    pub fn effective_method(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_ENTRY_METHOD)
    }

    /// Returns the effective entry function, defaulting to "main".
    pub fn effective_function(&self) -> &str {
        self.function.as_deref().unwrap_or(DEFAULT_ENTRY_FUNCTION)
    }

    /// Returns whether a missing entry method is fatal, defaulting to true.
    pub fn effective_required(&self) -> bool {
        self.required.unwrap_or(true)
    }
}
