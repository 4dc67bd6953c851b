//! Renderer errors.

use super::error_code::{self, BundleErrorCode};

/// Errors that can occur while emitting the compilation unit.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The emitted text did not re-parse; `line`/`column` point into the
    /// rendered output.
    #[error("rendered output is malformed at {line}:{column}: {message}")]
    RenderFailure {
        line: usize,
        column: usize,
        message: String,
    },
}

impl BundleErrorCode for RenderError {
    fn error_code(&self) -> &'static str {
        error_code::RENDER_FAILURE
    }
}
