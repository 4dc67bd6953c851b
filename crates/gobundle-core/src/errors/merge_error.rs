//! Merge errors.

use super::error_code::{self, BundleErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("No modules to merge")]
    NoMergeTargets,
}

impl BundleErrorCode for MergeError {
    fn error_code(&self) -> &'static str {
        error_code::NO_MERGE_TARGETS
    }
}
