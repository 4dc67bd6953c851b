//! BundleEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing an aggregation run.
///
/// Handlers only override the events they care about. `Send + Sync` so a
/// handler can be shared between runs on different threads.
pub trait BundleEventHandler: Send + Sync {
    fn on_module_loaded(&self, _event: &ModuleLoadedEvent) {}
    fn on_symbol_renamed(&self, _event: &SymbolRenamedEvent) {}
    fn on_unresolved_reference(&self, _event: &UnresolvedReferenceEvent) {}
    fn on_entry_synthesized(&self, _event: &EntrySynthesizedEvent) {}
    fn on_import_dropped(&self, _event: &ImportChangedEvent) {}
    fn on_import_added(&self, _event: &ImportChangedEvent) {}
}
