//! Import organizer for the rendered unit.
//!
//! Works the way `goimports` does on a single file: imports whose package
//! name is never used as a qualifier are dropped, well-known standard
//! library packages used as qualifiers are added, and the block is grouped
//! (standard library first) and sorted.

use rustc_hash::FxHashSet;

use gobundle_core::config::ImportsConfig;

use crate::model::ImportSpec;

/// Identifiers seen in a rendered body.
#[derive(Debug, Default, Clone)]
pub struct Usage {
    /// Operands of `x.y` selectors and packages of qualified types.
    pub qualifiers: FxHashSet<String>,
    /// Every other identifier occurrence.
    pub bare: FxHashSet<String>,
}

/// Standard library packages that may be added when referenced but not
/// imported, keyed by package name.
const STDLIB: &[(&str, &str)] = &[
    ("atomic", "sync/atomic"),
    ("big", "math/big"),
    ("bits", "math/bits"),
    ("bufio", "bufio"),
    ("bytes", "bytes"),
    ("cmp", "cmp"),
    ("context", "context"),
    ("errors", "errors"),
    ("fmt", "fmt"),
    ("heap", "container/heap"),
    ("io", "io"),
    ("list", "container/list"),
    ("maps", "maps"),
    ("math", "math"),
    ("os", "os"),
    ("rand", "math/rand"),
    ("regexp", "regexp"),
    ("slices", "slices"),
    ("sort", "sort"),
    ("strconv", "strconv"),
    ("strings", "strings"),
    ("sync", "sync"),
    ("time", "time"),
    ("unicode", "unicode"),
    ("utf8", "unicode/utf8"),
];

/// Import path of a well-known standard library package.
pub fn stdlib_path(package: &str) -> Option<&'static str> {
    STDLIB
        .binary_search_by_key(&package, |(name, _)| *name)
        .ok()
        .map(|i| STDLIB[i].1)
}

/// Standard library paths have no dot in their first segment.
pub fn is_stdlib(path: &str) -> bool {
    if path.starts_with('.') || path.starts_with('/') {
        return false;
    }
    let first = path.split('/').next().unwrap_or(path);
    !first.contains('.')
}

/// Package name assumed from an import path when no alias is given.
///
/// `example.com/go-yaml/v3` → `yaml`, `./util` → `util`.
pub fn assumed_package_name(path: &str) -> String {
    let mut segments = path.trim_end_matches('/').rsplit('/');
    let mut base = segments.next().unwrap_or(path);
    if is_major_version(base) {
        if let Some(parent) = segments.next().filter(|s| !s.is_empty() && *s != ".") {
            base = parent;
        }
    }
    let base = base.strip_prefix("go-").unwrap_or(base);
    let end = base
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(base.len());
    base[..end].to_string()
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Outcome of organizing one import set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizedImports {
    /// Final imports in rendering order.
    pub kept: Vec<ImportSpec>,
    pub dropped: Vec<ImportSpec>,
    pub added: Vec<ImportSpec>,
}

impl OrganizedImports {
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// Render the import block, without a trailing newline.
    /// Empty when there is nothing to import.
    pub fn render(&self) -> String {
        match self.kept.as_slice() {
            [] => String::new(),
            [single] => format!("import {single}"),
            specs => {
                let mut out = String::from("import (\n");
                let mut previous_std = None;
                for spec in specs {
                    let std = is_stdlib(&spec.path);
                    if previous_std.is_some_and(|p| p != std) {
                        out.push('\n');
                    }
                    previous_std = Some(std);
                    out.push('\t');
                    out.push_str(&spec.to_string());
                    out.push('\n');
                }
                out.push(')');
                out
            }
        }
    }
}

/// Drops unused imports, adds missing standard library ones and orders
/// the result.
#[derive(Debug, Clone, Copy)]
pub struct ImportOrganizer {
    drop_unused: bool,
    add_missing: bool,
}

impl Default for ImportOrganizer {
    fn default() -> Self {
        Self {
            drop_unused: true,
            add_missing: true,
        }
    }
}

impl ImportOrganizer {
    pub fn new(config: &ImportsConfig) -> Self {
        Self {
            drop_unused: config.effective_drop_unused(),
            add_missing: config.effective_add_missing(),
        }
    }

    pub fn organize<'a, I>(&self, imports: I, usage: &Usage) -> OrganizedImports
    where
        I: IntoIterator<Item = &'a ImportSpec>,
    {
        let mut organized = OrganizedImports::default();
        let mut names: FxHashSet<String> = FxHashSet::default();
        let mut paths: FxHashSet<&str> = FxHashSet::default();

        for spec in imports {
            if !paths.insert(spec.path.as_str()) {
                continue;
            }
            let name = spec.package_name();
            let used = spec.is_implicit() || usage.qualifiers.contains(&name);
            if used || !self.drop_unused {
                names.insert(name);
                organized.kept.push(spec.clone());
            } else {
                tracing::debug!(path = %spec.path, "dropping unused import");
                organized.dropped.push(spec.clone());
            }
        }

        if self.add_missing {
            let mut missing: Vec<&String> = usage
                .qualifiers
                .iter()
                .filter(|q| !names.contains(*q) && !usage.bare.contains(*q))
                .collect();
            missing.sort();
            for qualifier in missing {
                let Some(path) = stdlib_path(qualifier) else {
                    continue;
                };
                if paths.contains(path) {
                    continue;
                }
                tracing::debug!(path, "adding missing import");
                let spec = ImportSpec::new(path);
                organized.added.push(spec.clone());
                organized.kept.push(spec);
            }
        }

        organized
            .kept
            .sort_by(|a, b| (!is_stdlib(&a.path), &a.path).cmp(&(!is_stdlib(&b.path), &b.path)));
        organized
    }
}
