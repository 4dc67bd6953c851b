//! gobundle-core: shared plumbing for the gobundle aggregator.
//!
//! - Errors: one enum per pipeline stage plus the top-level `AggregateError`
//! - Config: TOML/env/CLI layered `BundleConfig`
//! - Events: observer trait and dispatcher for run diagnostics
//! - Tracing: subscriber setup for front ends

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;

pub use config::BundleConfig;
pub use errors::{AggregateError, BundleErrorCode};
