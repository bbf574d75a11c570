//! In-memory mock filesystem for testing without a real run summary.
//!
//! Clones of a `MockFs` share their contents, so a test can hand one clone
//! to a collector and rewrite files through another between scrapes.

use crate::collector::traits::FileSystem;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Entries {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Paths whose reads fail with the given error kind.
    errors: HashMap<PathBuf, io::ErrorKind>,
}

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    entries: Arc<RwLock<Entries>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file with the given content.
    ///
    /// Clears any read error previously injected for the same path.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.write();
        entries.errors.remove(&path);
        entries.files.insert(path, content.into());
    }

    /// Removes a file. Later reads fail with `NotFound`.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.write().files.remove(path.as_ref());
    }

    /// Makes reads of `path` fail with `kind`, whether or not the file exists.
    pub fn with_read_error(self, path: impl AsRef<Path>, kind: io::ErrorKind) -> Self {
        self.write().errors.insert(path.as_ref().to_path_buf(), kind);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let entries = self.read();
        if let Some(kind) = entries.errors.get(path) {
            return Err(io::Error::new(
                *kind,
                format!("injected error: {:?}", path),
            ));
        }
        entries.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }
}
