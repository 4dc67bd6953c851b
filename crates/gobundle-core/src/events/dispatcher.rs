//! EventDispatcher — synchronous event dispatch.

use std::sync::Arc;

use super::handler::BundleEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn BundleEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn BundleEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler does not stop later handlers from receiving it.
    fn emit<F: Fn(&dyn BundleEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    pub fn emit_module_loaded(&self, event: &ModuleLoadedEvent) {
        self.emit(|h| h.on_module_loaded(event));
    }

    pub fn emit_symbol_renamed(&self, event: &SymbolRenamedEvent) {
        self.emit(|h| h.on_symbol_renamed(event));
    }

    pub fn emit_unresolved_reference(&self, event: &UnresolvedReferenceEvent) {
        self.emit(|h| h.on_unresolved_reference(event));
    }

    pub fn emit_entry_synthesized(&self, event: &EntrySynthesizedEvent) {
        self.emit(|h| h.on_entry_synthesized(event));
    }

    pub fn emit_import_dropped(&self, event: &ImportChangedEvent) {
        self.emit(|h| h.on_import_dropped(event));
    }

    pub fn emit_import_added(&self, event: &ImportChangedEvent) {
        self.emit(|h| h.on_import_added(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
