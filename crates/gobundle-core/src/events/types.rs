//! Event payload types.

use std::path::PathBuf;

/// Payload for `on_module_loaded`.
#[derive(Debug, Clone)]
pub struct ModuleLoadedEvent {
    pub path: PathBuf,
    pub module: String,
    pub declarations: usize,
    pub imports: usize,
}

/// Payload for `on_symbol_renamed`.
#[derive(Debug, Clone)]
pub struct SymbolRenamedEvent {
    pub module: String,
    /// Qualified original reference, e.g. `util.Foo`.
    pub origin: String,
    pub replaced: String,
}

/// Payload for `on_unresolved_reference`.
#[derive(Debug, Clone)]
pub struct UnresolvedReferenceEvent {
    /// Module whose declarations contain the reference.
    pub module: String,
    /// The reference as written, e.g. `util.P`.
    pub reference: String,
}

/// Payload for `on_entry_synthesized`.
#[derive(Debug, Clone)]
pub struct EntrySynthesizedEvent {
    pub receiver: String,
    pub method: String,
    pub function: String,
    /// True when an existing entry function was replaced.
    pub replaced_existing: bool,
}

/// Payload for `on_import_dropped` and `on_import_added`.
#[derive(Debug, Clone)]
pub struct ImportChangedEvent {
    pub path: String,
    pub name: String,
}
