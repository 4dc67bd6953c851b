//! Loader errors.

use std::path::PathBuf;

use super::error_code::{self, BundleErrorCode};

/// Errors that can occur while turning a source file into a module.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{path}: not a .{expected} source file")]
    InvalidFileKind { path: PathBuf, expected: &'static str },

    #[error("{path}: no such file")]
    FileNotFound { path: PathBuf },

    #[error("{path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("{path}:{line}:{column}: {message}")]
    ParseFailure {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Grammar could not be loaded: {message}")]
    Grammar { message: String },
}

impl BundleErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidFileKind { .. } => error_code::INVALID_FILE_KIND,
            Self::FileNotFound { .. } => error_code::FILE_NOT_FOUND,
            Self::Io { .. } => error_code::IO_ERROR,
            Self::ParseFailure { .. } => error_code::PARSE_FAILURE,
            Self::Grammar { .. } => error_code::GRAMMAR_ERROR,
        }
    }
}
