//! Event system for gobundle.
//! Trait-based handlers with no-op defaults and a synchronous dispatcher.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::BundleEventHandler;
pub use types::*;
