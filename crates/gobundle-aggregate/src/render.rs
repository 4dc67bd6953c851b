//! Renderer: module → validated Go source text.

use tracing::debug;

use gobundle_core::config::ImportsConfig;
use gobundle_core::errors::RenderError;

use crate::imports::{ImportOrganizer, Usage};
use crate::model::{ImportSpec, Module};
use crate::parsers::go::{scan_usage, GoParser, SyntaxError};

/// Rendered compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Imports in the emitted block, in order.
    pub imports: Vec<ImportSpec>,
    pub dropped: Vec<ImportSpec>,
    pub added: Vec<ImportSpec>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    organizer: ImportOrganizer,
}

impl Renderer {
    pub fn new(config: &ImportsConfig) -> Self {
        Self {
            organizer: ImportOrganizer::new(config),
        }
    }

    /// Emit `module` as one source file and check that it parses.
    pub fn render(&self, parser: &mut GoParser, module: &Module) -> Result<Rendered, RenderError> {
        let body = module
            .declarations
            .iter()
            .map(|d| normalize(d.body().text()))
            .collect::<Vec<_>>()
            .join("\n\n");
        let header = format!("package {}", module.name);

        let draft = assemble(&header, "", &body);
        let tree = parser.parse(&draft).map_err(render_failure)?;
        let mut usage = Usage::default();
        scan_usage(tree.root_node(), &draft, &mut usage);

        let organized = self.organizer.organize(module.imports.values(), &usage);
        let text = assemble(&header, &organized.render(), &body);
        parser.parse(&text).map_err(render_failure)?;

        debug!(
            bytes = text.len(),
            imports = organized.kept.len(),
            dropped = organized.dropped.len(),
            added = organized.added.len(),
            "rendered module"
        );
        Ok(Rendered {
            text,
            imports: organized.kept,
            dropped: organized.dropped,
            added: organized.added,
        })
    }
}

/// Join the non-empty sections with blank lines and end with a newline.
fn assemble(header: &str, imports: &str, body: &str) -> String {
    let mut text = [header, imports, body]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    text.push('\n');
    text
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").trim_end().to_string()
}

fn render_failure(err: SyntaxError) -> RenderError {
    RenderError::RenderFailure {
        line: err.line,
        column: err.column,
        message: err.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Body, Declaration};

    fn module_with(bodies: &[&str], imports: &[&str]) -> Module {
        let mut module = Module::new("main", "main.go");
        for body in bodies {
            module
                .declarations
                .push(Declaration::Other(Body::new(*body, Vec::new())));
        }
        for path in imports {
            module.add_import(ImportSpec::new(*path));
        }
        module
    }

    #[test]
    fn layout_is_header_imports_declarations() {
        let module = module_with(
            &["func main() {\r\n\tfmt.Println(1)\r\n}  \n", "var x = 1"],
            &["fmt", "os"],
        );
        let mut parser = GoParser::new().unwrap();
        let rendered = Renderer::default().render(&mut parser, &module).unwrap();
        assert_eq!(
            rendered.text,
            "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(1)\n}\n\nvar x = 1\n"
        );
        assert_eq!(rendered.dropped, vec![ImportSpec::new("os")]);
    }

    #[test]
    fn missing_stdlib_import_is_added() {
        let module = module_with(&["func f() string { return strings.ToUpper(\"a\") }"], &[]);
        let mut parser = GoParser::new().unwrap();
        let rendered = Renderer::default().render(&mut parser, &module).unwrap();
        assert_eq!(rendered.added, vec![ImportSpec::new("strings")]);
        assert!(rendered.text.contains("import \"strings\"\n"));
    }

    #[test]
    fn empty_module_renders_package_clause_only() {
        let module = module_with(&[], &[]);
        let mut parser = GoParser::new().unwrap();
        let rendered = Renderer::default().render(&mut parser, &module).unwrap();
        assert_eq!(rendered.text, "package main\n");
    }

    #[test]
    fn malformed_declarations_fail_to_render() {
        let module = module_with(&["func broken( {"], &[]);
        let mut parser = GoParser::new().unwrap();
        let err = Renderer::default().render(&mut parser, &module).unwrap_err();
        let RenderError::RenderFailure { line, .. } = err;
        assert!(line >= 3);
    }
}
