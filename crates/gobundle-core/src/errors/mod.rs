//! Error handling for gobundle.
//! One error enum per pipeline stage, `thiserror` only.

pub mod aggregate_error;
pub mod config_error;
pub mod entry_error;
pub mod error_code;
pub mod load_error;
pub mod merge_error;
pub mod render_error;

pub use aggregate_error::AggregateError;
pub use config_error::ConfigError;
pub use entry_error::EntryError;
pub use error_code::BundleErrorCode;
pub use load_error::LoadError;
pub use merge_error::MergeError;
pub use render_error::RenderError;
