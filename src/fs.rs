//! File system seam for the write primitive
//!
//! The regeneration controller writes the output file through this trait so
//! tests can count writes without touching the disk.

use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

use crate::error::{GenError, GenResult};

/// Abstract file system interface for output writes
pub trait FileSystem: Send + Sync {
    /// Read file content
    fn read_to_string(&self, path: &Path) -> GenResult<String>;

    /// Write file content, replacing any existing content
    fn write(&self, path: &Path, contents: &str) -> GenResult<()>;
}

/// Local disk implementation. Creates parent directories on write.
#[derive(Debug, Default, Clone)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &Path) -> GenResult<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> GenResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| GenError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        std::fs::write(path, contents).map_err(|source| GenError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Mock file system for testing
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared with a
/// controller running on another thread.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockFileSystem {
    pub files: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<PathBuf, String>>>,
    /// When set, every write fails with a permission error.
    pub fail_writes: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> GenResult<String> {
        let files = self.files.lock().unwrap();
        files.get(path).cloned().ok_or_else(|| {
            GenError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file not found",
            ))
        })
    }

    fn write(&self, path: &Path, contents: &str) -> GenResult<()> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(GenError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "mock failure"),
            });
        }
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
