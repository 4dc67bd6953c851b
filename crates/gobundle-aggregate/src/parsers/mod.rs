//! Tree-sitter Go parsing: syntax validation and declaration extraction.

pub mod error_tolerant;
pub mod go;

pub use go::{GoParser, SyntaxError};
