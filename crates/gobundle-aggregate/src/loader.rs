//! Loader: one Go source file → one `Module`.

use std::io;
use std::path::Path;

use tracing::debug;

use gobundle_core::constants::SOURCE_EXTENSION;
use gobundle_core::errors::LoadError;

use crate::model::Module;
use crate::parsers::go::{extract, GoParser};
use crate::source_map::SourceMap;

/// Turns source files into modules. Owns the parser; positions go to the
/// caller's `SourceMap`.
pub struct Loader {
    parser: GoParser,
}

impl Loader {
    pub fn new() -> Result<Self, LoadError> {
        Ok(Self {
            parser: GoParser::new()?,
        })
    }

    /// Load the file at `path`. The extension is checked before the file
    /// is read or parsed.
    pub fn load(&mut self, sources: &mut SourceMap, path: &Path) -> Result<Module, LoadError> {
        check_extension(path)?;
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;
        self.load_source(sources, path, text)
    }

    /// Load in-memory text labelled with `path`.
    pub fn load_source(
        &mut self,
        sources: &mut SourceMap,
        path: &Path,
        text: String,
    ) -> Result<Module, LoadError> {
        check_extension(path)?;
        let id = sources.add(path, text);
        let source = sources.text(id);

        let tree = self.parser.parse(source).map_err(|err| {
            let location = sources.location(id, err.offset);
            LoadError::ParseFailure {
                path: location.path,
                line: location.line,
                column: location.column,
                message: err.message,
            }
        })?;

        let extracted = extract(tree.root_node(), source);
        let Some(name) = extracted.package else {
            return Err(LoadError::ParseFailure {
                path: path.to_path_buf(),
                line: 1,
                column: 1,
                message: "expected package clause".to_string(),
            });
        };

        let mut module = Module::new(name, path);
        for spec in extracted.imports {
            module.add_import(spec);
        }
        module.declarations = extracted.declarations;
        debug!(
            path = %path.display(),
            module = %module.name,
            declarations = module.declarations.len(),
            imports = module.imports.len(),
            "loaded module"
        );
        Ok(module)
    }

    pub fn parser_mut(&mut self) -> &mut GoParser {
        &mut self.parser
    }
}

fn check_extension(path: &Path) -> Result<(), LoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext == SOURCE_EXTENSION => Ok(()),
        _ => Err(LoadError::InvalidFileKind {
            path: path.to_path_buf(),
            expected: SOURCE_EXTENSION,
        }),
    }
}
