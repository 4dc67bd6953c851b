//! Merger: many modules → one module under main's package name.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use gobundle_core::errors::MergeError;

use crate::model::{AggregateWarning, Module, RenameMap, SiteKind};

/// Merged module plus the non-fatal findings of the merge.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub module: Module,
    pub warnings: Vec<AggregateWarning>,
}

/// Merge `modules` (main first) into one module.
///
/// `renames` is aligned with `modules[1..]`. Imports are deduplicated by
/// path with the first occurrence kept; qualified references into renamed
/// dependencies are replaced by the renamed identifier. References with no
/// mapping stay as written and are reported.
pub fn merge(modules: Vec<Module>, renames: &[RenameMap]) -> Result<MergeOutcome, MergeError> {
    let mut modules = modules.into_iter();
    let Some(main) = modules.next() else {
        return Err(MergeError::NoMergeTargets);
    };
    let dependencies: Vec<Module> = modules.collect();
    if dependencies.is_empty() {
        return Ok(MergeOutcome {
            module: main,
            warnings: Vec::new(),
        });
    }

    let renamed: FxHashSet<String> = dependencies
        .iter()
        .filter(|d| d.name != main.name)
        .map(|d| d.name.clone())
        .collect();
    let mut replacements: FxHashMap<&str, &str> = FxHashMap::default();
    for map in renames.iter().filter(|m| renamed.contains(m.module())) {
        replacements.extend(map.iter());
    }

    let mut merged = Module::new(main.name.clone(), main.path.clone());
    let mut unresolved: IndexSet<(String, String)> = IndexSet::new();

    for module in std::iter::once(main).chain(dependencies) {
        let origin = module.name;
        for spec in module.imports.into_values() {
            merged.add_import(spec);
        }
        for decl in module.declarations {
            let decl = decl.rewrite_sites(|site| {
                let SiteKind::Qualified {
                    qualifier,
                    symbol,
                    called,
                } = &site.kind
                else {
                    return None;
                };
                if !renamed.contains(qualifier) {
                    return None;
                }
                let reference = format!("{qualifier}.{symbol}");
                match replacements.get(reference.as_str()) {
                    Some(name) => Some((
                        name.to_string(),
                        SiteKind::Ident {
                            name: name.to_string(),
                            called: *called,
                        },
                    )),
                    None => {
                        unresolved.insert((origin.clone(), reference));
                        None
                    }
                }
            });
            merged.declarations.push(decl);
        }
    }

    let mut warnings = Vec::new();
    for (module, reference) in unresolved {
        warn!(%module, %reference, "qualified reference has no renamed target; left as written");
        warnings.push(AggregateWarning::UnresolvedReference { module, reference });
    }
    for name in duplicate_names(&merged) {
        warn!(%name, "declared more than once in merged module");
        warnings.push(AggregateWarning::DuplicateDeclaration { name });
    }

    debug!(
        module = %merged.name,
        declarations = merged.declarations.len(),
        imports = merged.imports.len(),
        "merged modules"
    );
    Ok(MergeOutcome {
        module: merged,
        warnings,
    })
}

/// Function and type names that occur more than once, in first-seen order.
fn duplicate_names(module: &Module) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut duplicates = IndexSet::new();
    for name in module.declared_names() {
        if name != "init" && name != "_" && !seen.insert(name) {
            duplicates.insert(name.to_string());
        }
    }
    duplicates.into_iter().collect()
}
