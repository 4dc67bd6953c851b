//! Collision resolver: gives a dependency's package-level functions a
//! module-specific prefix so they can share one package with main.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::model::{Declaration, FunctionDecl, Module, RenameMap, SiteKind};

/// Functions with this name are invoked implicitly and may repeat.
const INIT_FUNCTION: &str = "init";

/// Original function name → prefixed name, for one package.
type PackageRenames = FxHashMap<String, String>;

/// A dependency after renaming, plus the map for patching references to it.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub module: Module,
    pub renames: RenameMap,
}

#[derive(Debug, Clone)]
pub struct CollisionResolver {
    main_name: String,
}

impl CollisionResolver {
    pub fn new(main_name: impl Into<String>) -> Self {
        Self {
            main_name: main_name.into(),
        }
    }

    /// `_` followed by the lowercased module name.
    pub fn prefix_for(module_name: &str) -> String {
        format!("_{}", module_name.to_lowercase())
    }

    /// Rename the receiver-less functions of `module` and rewrite its own
    /// references to them. A module named like main is returned as is with
    /// an empty map.
    pub fn resolve(&self, module: Module) -> Resolved {
        let packages = self.package_renames(std::slice::from_ref(&module));
        self.rename(module, &packages)
    }

    /// Resolve every dependency, in order. Dependencies that declare the
    /// same package are one package split over several files: a reference
    /// in one file to a function declared in another is rewritten too.
    pub fn resolve_all(&self, modules: Vec<Module>) -> Vec<Resolved> {
        let packages = self.package_renames(&modules);
        modules
            .into_iter()
            .map(|module| self.rename(module, &packages))
            .collect()
    }

    fn package_renames(&self, modules: &[Module]) -> FxHashMap<String, PackageRenames> {
        let mut packages: FxHashMap<String, PackageRenames> = FxHashMap::default();
        for module in modules.iter().filter(|m| m.name != self.main_name) {
            let prefix = Self::prefix_for(&module.name);
            let package = packages.entry(module.name.clone()).or_default();
            for function in module.functions().filter(|f| is_renamable(f)) {
                package
                    .entry(function.name.clone())
                    .or_insert_with(|| format!("{prefix}_{}", function.name));
            }
        }
        packages
    }

    fn rename(&self, module: Module, packages: &FxHashMap<String, PackageRenames>) -> Resolved {
        let mut renames = RenameMap::new(module.name.clone());
        let package = match packages.get(&module.name) {
            Some(package) if module.name != self.main_name && !package.is_empty() => package,
            _ => {
                debug!(module = %module.name, "nothing to rename");
                return Resolved { module, renames };
            }
        };

        for function in module.functions().filter(|f| is_renamable(f)) {
            if let Some(new_name) = package.get(&function.name) {
                debug!(module = %module.name, from = %function.name, to = %new_name, "renaming");
                renames.insert(&function.name, new_name.clone());
            }
        }

        let Module {
            name,
            path,
            declarations,
            imports,
        } = module;
        let declarations = declarations
            .into_iter()
            .map(|decl| rename_declaration(decl, package))
            .collect();

        Resolved {
            module: Module {
                name,
                path,
                declarations,
                imports,
            },
            renames,
        }
    }
}

fn is_renamable(function: &FunctionDecl) -> bool {
    !function.is_method() && function.name != INIT_FUNCTION && function.name != "_"
}

fn rename_declaration(decl: Declaration, replaced: &PackageRenames) -> Declaration {
    let own_name = match &decl {
        Declaration::Function(f) if !f.is_method() => replaced.get(&f.name).cloned(),
        _ => None,
    };
    // a local binding hides the package function for the whole declaration
    let shadowed: FxHashSet<String> = decl
        .body()
        .sites()
        .iter()
        .filter_map(|site| match &site.kind {
            SiteKind::Binding { name } if replaced.contains_key(name) => Some(name.clone()),
            _ => None,
        })
        .collect();
    if !shadowed.is_empty() {
        debug!(names = ?shadowed, "local bindings shadow package functions");
    }

    let rewritten = decl.rewrite_sites(|site| match &site.kind {
        SiteKind::Name => own_name.clone().map(|n| (n, SiteKind::Name)),
        SiteKind::Ident { name, called } if !shadowed.contains(name) => {
            replaced.get(name).map(|n| {
                (
                    n.clone(),
                    SiteKind::Ident {
                        name: n.clone(),
                        called: *called,
                    },
                )
            })
        }
        _ => None,
    });

    match (rewritten, own_name) {
        (Declaration::Function(mut f), Some(name)) => {
            f.name = name;
            Declaration::Function(f)
        }
        (decl, _) => decl,
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::loader::Loader;
    use crate::source_map::SourceMap;

    fn module(path: &str, source: &str) -> Module {
        let mut loader = Loader::new().unwrap();
        loader
            .load_source(&mut SourceMap::new(), Path::new(path), source.to_string())
            .unwrap()
    }

    fn function_text(module: &Module, name: &str) -> String {
        module
            .functions()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("no function {name}"))
            .body
            .text()
            .to_string()
    }

    const UTIL: &str = "package Util\n\nfunc Foo() int { return helper() + 1 }\n\nfunc helper() int { return 1 }\n\nfunc init() { helper() }\n\ntype T struct{}\n\nfunc (T) Foo() int { return helper() }\n";

    #[test]
    fn prefix_is_lowercased() {
        assert_eq!(CollisionResolver::prefix_for("Util"), "_util");
    }

    #[test]
    fn renames_functions_and_their_calls() {
        let resolved = CollisionResolver::new("main").resolve(module("util.go", UTIL));
        assert_eq!(resolved.renames.get("Util.Foo"), Some("_util_Foo"));
        assert_eq!(resolved.renames.get("Util.helper"), Some("_util_helper"));
        assert_eq!(resolved.renames.len(), 2);
        assert_eq!(
            function_text(&resolved.module, "_util_Foo"),
            "func _util_Foo() int { return _util_helper() + 1 }"
        );
        assert_eq!(function_text(&resolved.module, "init"), "func init() { _util_helper() }");
    }

    #[test]
    fn methods_and_types_keep_their_names() {
        let resolved = CollisionResolver::new("main").resolve(module("util.go", UTIL));
        let method = resolved
            .module
            .functions()
            .find(|f| f.is_method())
            .unwrap();
        assert_eq!(method.name, "Foo");
        assert_eq!(method.body.text(), "func (T) Foo() int { return _util_helper() }");
        assert!(resolved.module.declared_names().contains(&"T"));
    }

    #[test]
    fn split_package_shares_one_rename_set() {
        let a = module("a.go", "package util\n\nfunc A() int { return helperB() }\n");
        let b = module("b.go", "package util\n\nfunc helperB() int { return 2 }\n");
        let resolved = CollisionResolver::new("main").resolve_all(vec![a, b]);

        assert_eq!(
            function_text(&resolved[0].module, "_util_A"),
            "func _util_A() int { return _util_helperB() }"
        );
        assert_eq!(
            function_text(&resolved[1].module, "_util_helperB"),
            "func _util_helperB() int { return 2 }"
        );
        assert_eq!(resolved[0].renames.iter().collect::<Vec<_>>(), vec![("util.A", "_util_A")]);
        assert_eq!(
            resolved[1].renames.iter().collect::<Vec<_>>(),
            vec![("util.helperB", "_util_helperB")]
        );
    }

    #[test]
    fn function_values_are_renamed() {
        let resolved = CollisionResolver::new("main").resolve(module(
            "util.go",
            "package util\n\nfunc one() int { return 1 }\n\nfunc Pick() int {\n\tf := one\n\treturn f()\n}\n",
        ));
        assert_eq!(
            function_text(&resolved.module, "_util_Pick"),
            "func _util_Pick() int {\n\tf := _util_one\n\treturn f()\n}"
        );
    }

    #[test]
    fn local_bindings_shadow_package_functions() {
        let resolved = CollisionResolver::new("main").resolve(module(
            "util.go",
            "package util\n\nfunc helper() int { return 1 }\n\nfunc Local() int {\n\thelper := func() int { return 42 }\n\treturn helper()\n}\n\nfunc Param(helper func() int) int { return helper() }\n\nfunc Plain() int { return helper() }\n",
        ));
        assert_eq!(
            function_text(&resolved.module, "_util_Local"),
            "func _util_Local() int {\n\thelper := func() int { return 42 }\n\treturn helper()\n}"
        );
        assert_eq!(
            function_text(&resolved.module, "_util_Param"),
            "func _util_Param(helper func() int) int { return helper() }"
        );
        assert_eq!(
            function_text(&resolved.module, "_util_Plain"),
            "func _util_Plain() int { return _util_helper() }"
        );
    }

    #[test]
    fn same_name_module_is_untouched() {
        let original = module("util.go", UTIL);
        let resolved = CollisionResolver::new("Util").resolve(original.clone());
        assert!(resolved.renames.is_empty());
        assert_eq!(resolved.module, original);
    }
}
