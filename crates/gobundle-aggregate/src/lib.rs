//! # gobundle-aggregate
//!
//! Single-file aggregation of Go sources: load → resolve collisions → merge → synthesize entry → render.
//! Every run owns its source map, parser and intermediate modules; nothing is shared between runs.

pub mod entry;
pub mod imports;
pub mod loader;
pub mod merger;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod source_map;

pub use entry::{EntryPoint, EntrySynthesizer, Synthesis};
pub use loader::Loader;
pub use merger::{merge, MergeOutcome};
pub use model::{AggregateWarning, Declaration, Module, RenameMap};
pub use pipeline::{aggregate, AggregationResult, Aggregator, SourceFile};
pub use render::{Rendered, Renderer};
pub use resolver::{CollisionResolver, Resolved};
pub use source_map::SourceMap;
