//! Observability for gobundle.
//! `tracing` crate with `EnvFilter`, per-stage log levels.

pub mod setup;

pub use setup::init_tracing;
