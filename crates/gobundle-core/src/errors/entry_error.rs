//! Entry-point errors.

use super::error_code::{self, BundleErrorCode};

/// Errors raised when the merged unit has no usable program entry.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("No receiver-bound method named `{method}` in module `{module}`")]
    NoSolverFound { module: String, method: String },
}

impl BundleErrorCode for EntryError {
    fn error_code(&self) -> &'static str {
        error_code::NO_SOLVER_FOUND
    }
}
