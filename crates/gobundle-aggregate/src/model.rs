//! Declaration model shared by every aggregation stage.
//!
//! A `Module` is a parsed Go file reduced to its package name, its top-level
//! declarations and its imports. Declaration payloads are the exact source
//! text plus the rewritable sites found in it, so renaming and reference
//! patching are pure text rewrites rather than tree mutation.

use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use indexmap::IndexMap;
use smallvec::SmallVec;

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Declared package name.
    pub name: String,
    /// Where the module was loaded from.
    pub path: PathBuf,
    /// Top-level declarations in source order. Imports live only in
    /// `imports`.
    pub declarations: Vec<Declaration>,
    /// Imports keyed by path; first occurrence wins, insertion order kept.
    pub imports: IndexMap<String, ImportSpec>,
}

impl Module {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            declarations: Vec::new(),
            imports: IndexMap::new(),
        }
    }

    /// Add an import unless its path is already present.
    /// Returns false when the path was a duplicate.
    pub fn add_import(&mut self, spec: ImportSpec) -> bool {
        if self.imports.contains_key(&spec.path) {
            return false;
        }
        self.imports.insert(spec.path.clone(), spec);
        true
    }

    pub fn import_paths(&self) -> impl Iterator<Item = &str> {
        self.imports.keys().map(String::as_str)
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Function(f) => Some(f),
            _ => None,
        })
    }

    /// Names of every function and type declaration, in order.
    /// Methods are excluded; they live in their receiver's method set.
    pub fn declared_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for decl in &self.declarations {
            match decl {
                Declaration::Function(f) if f.receiver.is_none() => names.push(f.name.as_str()),
                Declaration::Type(t) => names.extend(t.names.iter().map(String::as_str)),
                _ => {}
            }
        }
        names
    }
}

/// One top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Function(FunctionDecl),
    Type(TypeDecl),
    Other(Body),
}

impl Declaration {
    pub fn body(&self) -> &Body {
        match self {
            Declaration::Function(f) => &f.body,
            Declaration::Type(t) => &t.body,
            Declaration::Other(b) => b,
        }
    }

    pub(crate) fn body_mut(&mut self) -> &mut Body {
        match self {
            Declaration::Function(f) => &mut f.body,
            Declaration::Type(t) => &mut t.body,
            Declaration::Other(b) => b,
        }
    }

    /// Rewrite the sites of this declaration's body.
    pub fn rewrite_sites<F>(self, f: F) -> Declaration
    where
        F: FnMut(&Site) -> Option<(String, SiteKind)>,
    {
        match self {
            Declaration::Function(mut func) => {
                func.body = func.body.rewrite(f);
                Declaration::Function(func)
            }
            Declaration::Type(mut ty) => {
                ty.body = ty.body.rewrite(f);
                Declaration::Type(ty)
            }
            Declaration::Other(body) => Declaration::Other(body.rewrite(f)),
        }
    }
}

/// A function or a receiver-bound method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub receiver: Option<Receiver>,
    pub body: Body,
}

impl FunctionDecl {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Receiver of a method, already dereferenced to its named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Receiver {
    pub type_name: String,
    pub pointer: bool,
}

/// A `type` declaration; grouped declarations carry every spec name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub names: SmallVec<[String; 1]>,
    pub body: Body,
}

impl TypeDecl {
    /// Primary (first) name.
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }
}

/// One import spec: `alias "path"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportSpec {
    /// Unquoted import path.
    pub path: String,
    /// `_`, `.` or an identifier.
    pub alias: Option<String>,
}

impl ImportSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }

    /// Name the package is referenced by in code.
    pub fn package_name(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => crate::imports::assumed_package_name(&self.path),
        }
    }

    /// Blank, dot and cgo imports are never referenced by a qualifier.
    pub fn is_implicit(&self) -> bool {
        matches!(self.alias.as_deref(), Some("_") | Some(".")) || self.path == "C"
    }
}

impl fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{alias} \"{}\"", self.path),
            None => write!(f, "\"{}\"", self.path),
        }
    }
}

/// Source text of one declaration plus its rewritable sites.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body {
    text: String,
    sites: Vec<Site>,
}

/// A span of a body that a rewrite may replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Byte range relative to the body text.
    pub span: Range<usize>,
    pub kind: SiteKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteKind {
    /// The declaration's own name.
    Name,
    /// Unqualified identifier reference.
    Ident { name: String, called: bool },
    /// A name bound inside the declaration: parameter, `:=`, `var`,
    /// `const`, range variable or type parameter.
    Binding { name: String },
    /// `qualifier.symbol`, as an expression or a type.
    Qualified {
        qualifier: String,
        symbol: String,
        called: bool,
    },
}

impl SiteKind {
    pub fn qualified_name(&self) -> Option<String> {
        match self {
            SiteKind::Qualified {
                qualifier, symbol, ..
            } => Some(format!("{qualifier}.{symbol}")),
            _ => None,
        }
    }
}

impl Body {
    /// Sites must lie inside `text` and must not overlap.
    pub fn new(text: impl Into<String>, mut sites: Vec<Site>) -> Self {
        sites.sort_by_key(|s| s.span.start);
        Self {
            text: text.into(),
            sites,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Extend the text past its current end; existing sites keep their spans.
    pub(crate) fn append(&mut self, tail: &str) {
        self.text.push_str(tail);
    }

    /// Produce a new body where every site for which `f` returns a
    /// replacement is substituted, and all later spans are shifted.
    pub fn rewrite<F>(self, mut f: F) -> Body
    where
        F: FnMut(&Site) -> Option<(String, SiteKind)>,
    {
        if self.sites.is_empty() {
            return self;
        }
        let mut text = String::with_capacity(self.text.len());
        let mut sites = Vec::with_capacity(self.sites.len());
        let mut cursor = 0;
        for site in self.sites {
            text.push_str(&self.text[cursor..site.span.start]);
            let start = text.len();
            let (kind, replacement) = match f(&site) {
                Some((replacement, kind)) => (kind, replacement),
                None => (site.kind, self.text[site.span.clone()].to_string()),
            };
            text.push_str(&replacement);
            sites.push(Site {
                span: start..text.len(),
                kind,
            });
            cursor = site.span.end;
        }
        text.push_str(&self.text[cursor..]);
        Body { text, sites }
    }
}

/// Qualified reference (`module.symbol`) → synthesized unqualified name,
/// for one dependency module.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenameMap {
    module: String,
    entries: IndexMap<String, String>,
}

impl RenameMap {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Record `module.symbol` → `replaced`.
    pub fn insert(&mut self, symbol: &str, replaced: impl Into<String>) {
        self.entries
            .insert(format!("{}.{}", self.module, symbol), replaced.into());
    }

    /// Look up a qualified reference string such as `util.Foo`.
    pub fn get(&self, qualified: &str) -> Option<&str> {
        self.entries.get(qualified).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Non-fatal findings of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateWarning {
    /// A qualified reference into a renamed dependency had no mapping and
    /// was left as written.
    UnresolvedReference { module: String, reference: String },
    /// An existing entry function was replaced by the synthesized one.
    EntryReplaced { function: String },
    /// Two merged declarations share a name.
    DuplicateDeclaration { name: String },
}

impl fmt::Display for AggregateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateWarning::UnresolvedReference { module, reference } => {
                write!(f, "unresolved reference `{reference}` in module `{module}`")
            }
            AggregateWarning::EntryReplaced { function } => {
                write!(f, "existing `{function}` replaced by synthesized entry")
            }
            AggregateWarning::DuplicateDeclaration { name } => {
                write!(f, "`{name}` is declared more than once")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, span: Range<usize>) -> Site {
        Site {
            span,
            kind: SiteKind::Ident {
                name: name.into(),
                called: true,
            },
        }
    }

    #[test]
    fn rewrite_shifts_later_sites() {
        let body = Body::new("a(b(x))", vec![call("a", 0..1), call("b", 2..3)]);
        let out = body.rewrite(|site| match &site.kind {
            SiteKind::Ident { name, called } => Some((
                format!("_p_{name}"),
                SiteKind::Ident {
                    name: format!("_p_{name}"),
                    called: *called,
                },
            )),
            _ => None,
        });
        assert_eq!(out.text(), "_p_a(_p_b(x))");
        assert_eq!(out.sites()[0].span, 0..4);
        assert_eq!(out.sites()[1].span, 5..9);
        assert_eq!(&out.text()[out.sites()[1].span.clone()], "_p_b");
    }

    #[test]
    fn rewrite_without_replacements_is_identity() {
        let body = Body::new("f(g())", vec![call("g", 2..3), call("f", 0..1)]);
        let before = body.clone();
        assert_eq!(body.rewrite(|_| None), before);
    }

    #[test]
    fn rename_map_keys_are_qualified() {
        let mut map = RenameMap::new("util");
        map.insert("Foo", "_util_Foo");
        assert_eq!(map.get("util.Foo"), Some("_util_Foo"));
        assert_eq!(map.get("Foo"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn add_import_keeps_first_occurrence() {
        let mut module = Module::new("main", "main.go");
        assert!(module.add_import(ImportSpec::aliased("fmt", "f")));
        assert!(!module.add_import(ImportSpec::new("fmt")));
        assert_eq!(module.imports["fmt"].alias.as_deref(), Some("f"));
    }
}
