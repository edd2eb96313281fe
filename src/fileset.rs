//! In-memory registry of currently-matched files
//!
//! Order is discovery order, never sorted — generated barrels list modules
//! in the order the watch primitive reported them.

use std::path::{Path, PathBuf};

/// Ordered set of matched files, owned by the regeneration controller.
#[derive(Debug, Default)]
pub struct FileSet {
    files: Vec<PathBuf>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless it is already tracked.
    ///
    /// Watch primitives occasionally redeliver an add for a known path, so
    /// this is idempotent. Returns true when the set actually changed.
    pub fn add(&mut self, path: PathBuf) -> bool {
        if self.files.contains(&path) {
            return false;
        }
        self.files.push(path);
        true
    }

    /// Remove every occurrence of `path`, preserving the order of the rest.
    /// Returns true when the set actually changed.
    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f != path);
        self.files.len() != before
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
