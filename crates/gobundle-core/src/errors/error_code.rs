//! BundleErrorCode trait for user-facing diagnostics.

/// Trait for mapping gobundle errors to stable error-kind codes.
/// Every error enum implements this so front ends can report the kind
/// without matching on concrete variants.
pub trait BundleErrorCode {
    /// Returns the error-kind code string (e.g., "PARSE_FAILURE").
    fn error_code(&self) -> &'static str;

    /// Returns the single-line diagnostic: `[ERROR_CODE] message`.
    fn diagnostic(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const INVALID_FILE_KIND: &str = "INVALID_FILE_KIND";
pub const FILE_NOT_FOUND: &str = "FILE_NOT_FOUND";
pub const IO_ERROR: &str = "IO_ERROR";
pub const PARSE_FAILURE: &str = "PARSE_FAILURE";
pub const GRAMMAR_ERROR: &str = "GRAMMAR_ERROR";
pub const NO_MERGE_TARGETS: &str = "NO_MERGE_TARGETS";
pub const NO_SOLVER_FOUND: &str = "NO_SOLVER_FOUND";
pub const RENDER_FAILURE: &str = "RENDER_FAILURE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
