//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize the gobundle tracing/logging system.
///
/// Reads `GOBUNDLE_LOG` for per-module log levels, e.g.
/// `GOBUNDLE_LOG=gobundle_aggregate::merge=debug,gobundle=info`.
/// Falls back to `gobundle=warn` if unset or invalid.
///
/// Output goes to stderr; stdout carries the rendered unit.
/// Calling this more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("gobundle=warn"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
