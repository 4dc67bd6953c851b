//! Configuration system for gobundle.
//! TOML-based, 3-layer resolution: CLI > env > explicit file > defaults.

pub mod bundle_config;
pub mod entry_config;
pub mod imports_config;

pub use bundle_config::{BundleConfig, CliOverrides};
pub use entry_config::EntryConfig;
pub use imports_config::ImportsConfig;
