//! Shared constants for the gobundle aggregator.

/// Canonical extension of Go source files, without the dot.
pub const SOURCE_EXTENSION: &str = "go";

/// Default receiver-bound method that marks a solver type.
pub const DEFAULT_ENTRY_METHOD: &str = "Solve";

/// Default name of the synthesized program-entry function.
pub const DEFAULT_ENTRY_FUNCTION: &str = "main";

/// Environment variable read by `init_tracing`.
pub const LOG_ENV_VAR: &str = "GOBUNDLE_LOG";
