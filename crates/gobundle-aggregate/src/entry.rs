//! Entry-point synthesizer.
//!
//! Finds the first receiver-bound method with the entry-method name and
//! appends a `main` that constructs the receiver and calls it.

use tracing::debug;

use gobundle_core::config::EntryConfig;
use gobundle_core::constants::{DEFAULT_ENTRY_FUNCTION, DEFAULT_ENTRY_METHOD};

use crate::model::{Body, Declaration, FunctionDecl, Module, Site, SiteKind};

/// The method a synthesized entry invokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub receiver_type: String,
    /// Whether the method was declared on a pointer receiver.
    pub pointer: bool,
    pub method: String,
}

/// Result of a synthesis pass. `entry` is `None` when no method matched,
/// in which case `module` is returned unmodified.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub module: Module,
    pub entry: Option<EntryPoint>,
    /// An existing receiver-less entry function was removed.
    pub replaced: bool,
}

#[derive(Debug, Clone)]
pub struct EntrySynthesizer {
    method: String,
    function: String,
}

impl Default for EntrySynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRY_METHOD, DEFAULT_ENTRY_FUNCTION)
    }
}

impl EntrySynthesizer {
    pub fn new(method: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            function: function.into(),
        }
    }

    pub fn from_config(config: &EntryConfig) -> Self {
        Self::new(config.effective_method(), config.effective_function())
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    /// First method named like the entry method, in declaration order.
    pub fn find(&self, module: &Module) -> Option<EntryPoint> {
        module.functions().find_map(|f| {
            let receiver = f.receiver.as_ref()?;
            (f.name == self.method).then(|| EntryPoint {
                receiver_type: receiver.type_name.clone(),
                pointer: receiver.pointer,
                method: f.name.clone(),
            })
        })
    }

    /// Source text of the entry function for `entry`.
    pub fn entry_source(&self, entry: &EntryPoint) -> String {
        format!(
            "func {}() {{\n\tsolver := new({})\n\tsolver.{}()\n}}",
            self.function, entry.receiver_type, entry.method
        )
    }

    pub fn synthesize(&self, mut module: Module) -> Synthesis {
        let Some(entry) = self.find(&module) else {
            debug!(module = %module.name, method = %self.method, "no entry method");
            return Synthesis {
                module,
                entry: None,
                replaced: false,
            };
        };

        let before = module.declarations.len();
        module.declarations.retain(|d| {
            !matches!(d, Declaration::Function(f) if !f.is_method() && f.name == self.function)
        });
        let replaced = module.declarations.len() != before;

        let text = self.entry_source(&entry);
        let name_start = "func ".len();
        let name = Site {
            span: name_start..name_start + self.function.len(),
            kind: SiteKind::Name,
        };
        module.declarations.push(Declaration::Function(FunctionDecl {
            name: self.function.clone(),
            receiver: None,
            body: Body::new(text, vec![name]),
        }));
        debug!(
            receiver = %entry.receiver_type,
            method = %entry.method,
            replaced,
            "synthesized entry function"
        );

        Synthesis {
            module,
            entry: Some(entry),
            replaced,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::loader::Loader;
    use crate::source_map::SourceMap;

    fn module(source: &str) -> Module {
        Loader::new()
            .unwrap()
            .load_source(&mut SourceMap::new(), Path::new("main.go"), source.to_string())
            .unwrap()
    }

    #[test]
    fn appends_entry_for_pointer_receiver() {
        let synthesis = EntrySynthesizer::default()
            .synthesize(module("package main\n\ntype P struct{}\n\nfunc (p *P) Solve() {}\n"));
        assert_eq!(
            synthesis.entry,
            Some(EntryPoint {
                receiver_type: "P".into(),
                pointer: true,
                method: "Solve".into(),
            })
        );
        let last = synthesis.module.declarations.last().unwrap();
        assert_eq!(
            last.body().text(),
            "func main() {\n\tsolver := new(P)\n\tsolver.Solve()\n}"
        );
        assert!(!synthesis.replaced);
    }

    #[test]
    fn first_match_wins() {
        let synthesis = EntrySynthesizer::default().synthesize(module(
            "package main\n\ntype A struct{}\ntype B struct{}\n\nfunc (B) Solve() {}\n\nfunc (a A) Solve() {}\n",
        ));
        assert_eq!(synthesis.entry.unwrap().receiver_type, "B");
    }

    #[test]
    fn free_function_is_not_an_entry() {
        let original = module("package main\n\nfunc Solve() {}\n");
        let synthesis = EntrySynthesizer::default().synthesize(original.clone());
        assert!(synthesis.entry.is_none());
        assert_eq!(synthesis.module, original);
    }

    #[test]
    fn existing_main_is_replaced() {
        let synthesis = EntrySynthesizer::default().synthesize(module(
            "package main\n\nfunc main() {}\n\ntype P struct{}\n\nfunc (p P) Solve() {}\n",
        ));
        assert!(synthesis.replaced);
        let mains = synthesis
            .module
            .functions()
            .filter(|f| f.name == "main")
            .count();
        assert_eq!(mains, 1);
    }

    #[test]
    fn names_come_from_config() {
        let config = EntryConfig {
            method: Some("Run".into()),
            function: Some("main".into()),
            required: None,
        };
        let synthesizer = EntrySynthesizer::from_config(&config);
        let synthesis =
            synthesizer.synthesize(module("package main\n\ntype App struct{}\n\nfunc (a *App) Run() {}\n"));
        let last = synthesis.module.declarations.last().unwrap();
        assert!(last.body().text().contains("solver.Run()"));
    }
}
