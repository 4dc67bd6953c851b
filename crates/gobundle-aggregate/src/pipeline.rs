//! Aggregation pipeline: Loader → Collision Resolver → Merger →
//! Entry-Point Synthesizer → Renderer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use gobundle_core::errors::{AggregateError, EntryError, MergeError};
use gobundle_core::events::{
    BundleEventHandler, EntrySynthesizedEvent, EventDispatcher, ImportChangedEvent,
    ModuleLoadedEvent, SymbolRenamedEvent, UnresolvedReferenceEvent,
};
use gobundle_core::BundleConfig;

use crate::entry::{EntryPoint, EntrySynthesizer};
use crate::loader::Loader;
use crate::merger::merge;
use crate::model::{AggregateWarning, ImportSpec, Module, RenameMap};
use crate::render::Renderer;
use crate::resolver::CollisionResolver;
use crate::source_map::SourceMap;

/// In-memory input file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct AggregationResult {
    /// Final merged module, synthesized entry last.
    pub module: Module,
    /// Rendered compilation unit.
    pub text: String,
    pub entry: Option<EntryPoint>,
    pub warnings: Vec<AggregateWarning>,
}

/// Runs aggregations. Each run gets its own `SourceMap` and parser, so one
/// aggregator can serve several runs.
#[derive(Debug, Default)]
pub struct Aggregator {
    config: BundleConfig,
    events: EventDispatcher,
}

impl Aggregator {
    pub fn new(config: BundleConfig) -> Self {
        Self {
            config,
            events: EventDispatcher::new(),
        }
    }

    pub fn with_handler(mut self, handler: Arc<dyn BundleEventHandler>) -> Self {
        self.events.register(handler);
        self
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Aggregate the files at `main` and `dependencies` (in that order).
    #[instrument(skip_all, fields(main = %main.display(), dependencies = dependencies.len()))]
    pub fn aggregate<P: AsRef<Path>>(
        &self,
        main: &Path,
        dependencies: &[P],
    ) -> Result<AggregationResult, AggregateError> {
        let mut loader = Loader::new()?;
        let mut sources = SourceMap::new();
        let mut modules = Vec::with_capacity(dependencies.len() + 1);
        for path in std::iter::once(main).chain(dependencies.iter().map(AsRef::as_ref)) {
            let module = loader.load(&mut sources, path)?;
            self.loaded(&module);
            modules.push(module);
        }
        self.finish(&mut loader, modules)
    }

    /// Same as [`Aggregator::aggregate`] for text already in memory.
    #[instrument(skip_all, fields(main = %main.path.display(), dependencies = dependencies.len()))]
    pub fn aggregate_sources(
        &self,
        main: SourceFile,
        dependencies: Vec<SourceFile>,
    ) -> Result<AggregationResult, AggregateError> {
        let mut loader = Loader::new()?;
        let mut sources = SourceMap::new();
        let mut modules = Vec::with_capacity(dependencies.len() + 1);
        for file in std::iter::once(main).chain(dependencies) {
            let module = loader.load_source(&mut sources, &file.path, file.text)?;
            self.loaded(&module);
            modules.push(module);
        }
        self.finish(&mut loader, modules)
    }

    fn loaded(&self, module: &Module) {
        self.events.emit_module_loaded(&ModuleLoadedEvent {
            path: module.path.clone(),
            module: module.name.clone(),
            declarations: module.declarations.len(),
            imports: module.imports.len(),
        });
    }

    fn finish(
        &self,
        loader: &mut Loader,
        modules: Vec<Module>,
    ) -> Result<AggregationResult, AggregateError> {
        let mut modules = modules.into_iter();
        let Some(main) = modules.next() else {
            return Err(MergeError::NoMergeTargets.into());
        };

        let resolver = CollisionResolver::new(main.name.clone());
        let mut merged_inputs = vec![main];
        let mut renames: Vec<RenameMap> = Vec::new();
        for resolved in resolver.resolve_all(modules.collect()) {
            for (origin, replaced) in resolved.renames.iter() {
                self.events.emit_symbol_renamed(&SymbolRenamedEvent {
                    module: resolved.renames.module().to_string(),
                    origin: origin.to_string(),
                    replaced: replaced.to_string(),
                });
            }
            merged_inputs.push(resolved.module);
            renames.push(resolved.renames);
        }
        debug!(modules = merged_inputs.len(), "resolved collisions");

        let outcome = merge(merged_inputs, &renames)?;
        let mut warnings = outcome.warnings;
        for warning in &warnings {
            if let AggregateWarning::UnresolvedReference { module, reference } = warning {
                self.events.emit_unresolved_reference(&UnresolvedReferenceEvent {
                    module: module.clone(),
                    reference: reference.clone(),
                });
            }
        }

        let entry_config = &self.config.entry;
        let synthesizer = EntrySynthesizer::from_config(entry_config);
        let synthesis = synthesizer.synthesize(outcome.module);
        match &synthesis.entry {
            Some(entry) => {
                if synthesis.replaced {
                    warn!(function = synthesizer.function(), "existing entry function replaced");
                    warnings.push(AggregateWarning::EntryReplaced {
                        function: synthesizer.function().to_string(),
                    });
                }
                self.events.emit_entry_synthesized(&EntrySynthesizedEvent {
                    receiver: entry.receiver_type.clone(),
                    method: entry.method.clone(),
                    function: synthesizer.function().to_string(),
                    replaced_existing: synthesis.replaced,
                });
            }
            None if entry_config.effective_required() => {
                return Err(EntryError::NoSolverFound {
                    module: synthesis.module.name,
                    method: synthesizer.method().to_string(),
                }
                .into());
            }
            None => debug!("no entry method; rendering without entry function"),
        }

        let rendered = Renderer::new(&self.config.imports)
            .render(loader.parser_mut(), &synthesis.module)?;
        for spec in &rendered.dropped {
            self.events.emit_import_dropped(&import_event(spec));
        }
        for spec in &rendered.added {
            self.events.emit_import_added(&import_event(spec));
        }

        info!(
            module = %synthesis.module.name,
            bytes = rendered.text.len(),
            warnings = warnings.len(),
            "aggregation complete"
        );
        Ok(AggregationResult {
            module: synthesis.module,
            text: rendered.text,
            entry: synthesis.entry,
            warnings,
        })
    }
}

fn import_event(spec: &ImportSpec) -> ImportChangedEvent {
    ImportChangedEvent {
        path: spec.path.clone(),
        name: spec.package_name(),
    }
}

/// Aggregate with the default configuration and return the rendered text.
pub fn aggregate<P: AsRef<Path>>(main: &Path, dependencies: &[P]) -> Result<String, AggregateError> {
    Aggregator::default()
        .aggregate(main, dependencies)
        .map(|result| result.text)
}
