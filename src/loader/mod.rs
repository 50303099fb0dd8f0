// SPDX-License-Identifier: MIT OR Apache-2.0

//! File loader - discovers and reads candidate source files

pub mod walk;

use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::DirEntry;

use crate::config::HarnessConfig;
use crate::errors::{HarnessError, Result};

pub use walk::{SourceWalk, WalkEvent};

/// A loaded source file; content is valid UTF-8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Extension of the file name, without the dot
    pub fn ext(&self) -> &str {
        extension_of(&self.path)
    }
}

/// Text after the last `.` of the file name; empty when there is none.
///
/// Unlike `Path::extension`, a leading dot counts (`.bashrc` -> `bashrc`).
pub fn extension_of(path: &Path) -> &str {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    name.rfind('.').map(|idx| &name[idx + 1..]).unwrap_or_default()
}

/// Loads supported files under a root
pub struct Loader<'a> {
    config: &'a HarnessConfig,
}

impl<'a> Loader<'a> {
    pub fn new(config: &'a HarnessConfig) -> Self {
        Self { config }
    }

    fn should_prune(&self, entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .map(|name| self.config.prune_dirs.contains(name))
            .unwrap_or(false)
    }

    /// Walk `root` and read every supported file, in traversal order.
    ///
    /// Pruning notices and non-UTF-8 skips are written to `out`. Any walk or
    /// read error aborts the load.
    pub fn load(&self, root: &Path, out: &mut dyn Write) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();

        for event in SourceWalk::new(root, |entry: &DirEntry| self.should_prune(entry)) {
            let entry = match event? {
                WalkEvent::Pruned(entry) => {
                    writeln!(out, "skipping {}", entry.file_name().to_string_lossy())?;
                    tracing::debug!(path = %entry.path().display(), "pruned directory");
                    continue;
                }
                WalkEvent::File(entry) => entry,
            };

            let path = entry.path();
            if !self.config.is_supported(extension_of(path)) {
                continue;
            }

            let bytes = std::fs::read(path).map_err(|source| HarnessError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            match String::from_utf8(bytes) {
                Ok(content) => files.push(SourceFile::new(entry.into_path(), content)),
                Err(_) => {
                    writeln!(out, "skipping a non-utf8 file: {}", path.display())?;
                }
            }
        }

        tracing::debug!(root = %root.display(), files = files.len(), "load complete");
        Ok(files)
    }
}
