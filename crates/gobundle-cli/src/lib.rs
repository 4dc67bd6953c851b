//! Command-line front end: flag parsing, exit codes and output streams
//! around the aggregation engine.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};

use gobundle_aggregate::Aggregator;
use gobundle_core::config::CliOverrides;
use gobundle_core::errors::{error_code, AggregateError};
use gobundle_core::events::{
    BundleEventHandler, EntrySynthesizedEvent, ImportChangedEvent, ModuleLoadedEvent,
    SymbolRenamedEvent,
};
use gobundle_core::{BundleConfig, BundleErrorCode};

pub const EXIT_OK: i32 = 0;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_INPUT: i32 = 10;
pub const EXIT_PARSE: i32 = 11;
pub const EXIT_NO_MERGE_TARGETS: i32 = 12;
pub const EXIT_NO_SOLVER: i32 = 13;
pub const EXIT_RENDER: i32 = 14;
pub const EXIT_CONFIG: i32 = 15;

#[derive(Parser, Debug)]
#[command(name = "gobundle", version)]
#[command(about = "Bundle a main Go file and its dependencies into one source file", long_about = None)]
pub struct Cli {
    /// Main source file
    #[arg(long, value_name = "PATH")]
    pub main: PathBuf,

    /// Dependency source file (repeatable, order kept)
    #[arg(long = "depends", value_name = "PATH")]
    pub depends: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Receiver-bound method that starts the program
    #[arg(long, value_name = "NAME")]
    pub entry_method: Option<String>,

    /// Emit the bundle even when no entry method exists
    #[arg(long)]
    pub allow_missing_entry: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            entry_method: self.entry_method.clone(),
            entry_required: self.allow_missing_entry.then_some(false),
        }
    }
}

/// Exit code for an error kind.
pub fn exit_code(code: &str) -> i32 {
    match code {
        error_code::INVALID_FILE_KIND | error_code::FILE_NOT_FOUND | error_code::IO_ERROR => {
            EXIT_INPUT
        }
        error_code::PARSE_FAILURE | error_code::GRAMMAR_ERROR => EXIT_PARSE,
        error_code::NO_MERGE_TARGETS => EXIT_NO_MERGE_TARGETS,
        error_code::NO_SOLVER_FOUND => EXIT_NO_SOLVER,
        error_code::RENDER_FAILURE => EXIT_RENDER,
        error_code::CONFIG_ERROR => EXIT_CONFIG,
        _ => EXIT_INPUT,
    }
}

/// Parse `args`, run one aggregation and write the bundle to `out`.
/// Failures are written to `err` as one `[CODE] message` line.
pub fn run<I, T>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_OK };
            let stream: &mut dyn Write = if e.use_stderr() { err } else { out };
            let _ = write!(stream, "{}", e.render());
            return code;
        }
    };
    debug!(?cli, "parsed arguments");

    match execute(&cli) {
        Ok(text) => match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            Ok(()) => EXIT_OK,
            Err(e) => {
                let _ = writeln!(err, "[{}] stdout: {e}", error_code::IO_ERROR);
                EXIT_INPUT
            }
        },
        Err(e) => {
            let _ = writeln!(err, "{}", e.diagnostic());
            exit_code(e.error_code())
        }
    }
}

fn execute(cli: &Cli) -> Result<String, AggregateError> {
    let config = BundleConfig::load(cli.config.as_deref(), Some(&cli.overrides()))?;
    let result = Aggregator::new(config)
        .with_handler(Arc::new(LogHandler))
        .aggregate(&cli.main, cli.depends.as_slice())?;
    Ok(result.text)
}

/// Reports run events through `tracing`.
struct LogHandler;

impl BundleEventHandler for LogHandler {
    fn on_module_loaded(&self, event: &ModuleLoadedEvent) {
        info!(
            path = %event.path.display(),
            module = %event.module,
            declarations = event.declarations,
            "module loaded"
        );
    }

    fn on_symbol_renamed(&self, event: &SymbolRenamedEvent) {
        debug!(origin = %event.origin, replaced = %event.replaced, "symbol renamed");
    }

    fn on_entry_synthesized(&self, event: &EntrySynthesizedEvent) {
        info!(
            receiver = %event.receiver,
            method = %event.method,
            function = %event.function,
            "entry synthesized"
        );
    }

    fn on_import_dropped(&self, event: &ImportChangedEvent) {
        debug!(path = %event.path, "import dropped");
    }

    fn on_import_added(&self, event: &ImportChangedEvent) {
        debug!(path = %event.path, "import added");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depends_is_repeatable_and_ordered() {
        let cli = Cli::try_parse_from([
            "gobundle", "--main", "m.go", "--depends", "b.go", "--depends", "a.go",
        ])
        .unwrap();
        assert_eq!(cli.depends, vec![PathBuf::from("b.go"), PathBuf::from("a.go")]);
        assert!(cli.config.is_none());
    }

    #[test]
    fn main_is_required() {
        assert!(Cli::try_parse_from(["gobundle"]).is_err());
    }

    #[test]
    fn allow_missing_entry_disables_requirement() {
        let cli = Cli::try_parse_from(["gobundle", "--main", "m.go", "--allow-missing-entry"])
            .unwrap();
        assert_eq!(cli.overrides().entry_required, Some(false));
        let cli = Cli::try_parse_from(["gobundle", "--main", "m.go"]).unwrap();
        assert_eq!(cli.overrides().entry_required, None);
    }

    #[test]
    fn every_error_kind_has_a_distinct_code() {
        let codes = [
            exit_code(error_code::INVALID_FILE_KIND),
            exit_code(error_code::PARSE_FAILURE),
            exit_code(error_code::NO_MERGE_TARGETS),
            exit_code(error_code::NO_SOLVER_FOUND),
            exit_code(error_code::RENDER_FAILURE),
            exit_code(error_code::CONFIG_ERROR),
        ];
        let mut unique = codes.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
        assert!(!codes.contains(&EXIT_OK) && !codes.contains(&EXIT_USAGE));
    }
}
