//! Per-run table of loaded sources and their line starts.
//!
//! Created fresh for every aggregation run and passed explicitly to the
//! loader; nothing here is global.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(u32);

/// 1-based position inside a loaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug)]
struct LoadedFile {
    path: PathBuf,
    text: String,
    line_starts: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<LoadedFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &Path, text: String) -> FileId {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        self.files.push(LoadedFile {
            path: path.to_path_buf(),
            text,
            line_starts,
        });
        FileId((self.files.len() - 1) as u32)
    }

    pub fn path(&self, id: FileId) -> &Path {
        &self.files[id.0 as usize].path
    }

    pub fn text(&self, id: FileId) -> &str {
        &self.files[id.0 as usize].text
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Translate a byte offset into a 1-based line and column.
    /// Offsets past the end clamp to the last position.
    pub fn location(&self, id: FileId, offset: usize) -> Location {
        let file = &self.files[id.0 as usize];
        let offset = offset.min(file.text.len());
        let line = match file.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Location {
            path: file.path.clone(),
            line: line + 1,
            column: offset - file.line_starts[line] + 1,
        }
    }
}
