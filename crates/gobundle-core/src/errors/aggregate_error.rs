//! Top-level aggregation error.

use super::error_code::BundleErrorCode;
use super::{ConfigError, EntryError, LoadError, MergeError, RenderError};

/// Errors that can occur during an aggregation run.
/// Wraps the stage errors via `From` so `?` keeps the original kind.
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BundleErrorCode for AggregateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Load(e) => e.error_code(),
            Self::Merge(e) => e.error_code(),
            Self::Entry(e) => e.error_code(),
            Self::Render(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
