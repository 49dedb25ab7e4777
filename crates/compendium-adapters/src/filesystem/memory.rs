//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use compendium_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem},
    },
    error::{ScaffoldError, ScaffoldResult},
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle while the service owns
/// another. Paths are stored as given; use absolute paths throughout.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    /// Writes to these paths fail, to exercise partial failures.
    failing_writes: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.read().files.get(path).cloned()
    }

    /// Make every later write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.write().failing_writes.insert(path.into());
    }

    /// Undo every [`fail_writes_to`](Self::fail_writes_to).
    pub fn clear_failures(&self) {
        self.write().failing_writes.clear();
    }

    /// Every file with its content, in path order.
    pub fn files(&self) -> Vec<(PathBuf, String)> {
        self.read()
            .files
            .iter()
            .map(|(p, c)| (p.clone(), c.clone()))
            .collect()
    }

    /// Every directory and file path, in order.
    pub fn paths(&self) -> Vec<PathBuf> {
        let inner = self.read();
        inner
            .directories
            .iter()
            .chain(inner.files.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // A poisoned lock only means another test thread panicked mid-write;
    // the maps themselves are still consistent.
    fn read(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn failure(path: &Path, operation: &'static str, reason: &str) -> ScaffoldError {
    ApplicationError::io(path, operation, reason).into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> ScaffoldResult<()> {
        let mut inner = self.write();

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.files.contains_key(&current) {
                return Err(failure(path, "create directory", "a file is in the way"));
            }
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ScaffoldResult<()> {
        let mut inner = self.write();

        if inner.failing_writes.contains(path) {
            return Err(failure(path, "write", "injected failure"));
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(failure(path, "write", "parent directory does not exist"));
            }
        }
        if inner.directories.contains(path) {
            return Err(failure(path, "write", "is a directory"));
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> ScaffoldResult<String> {
        self.read()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| failure(path, "read", "no such file"))
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read().directories.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.read().files.contains_key(path)
    }

    fn list_dir(&self, path: &Path) -> ScaffoldResult<Vec<DirEntry>> {
        let inner = self.read();
        if !inner.directories.contains(path) {
            return Err(failure(path, "list", "no such directory"));
        }

        let child_name = |p: &PathBuf| {
            (p.parent() == Some(path))
                .then(|| p.file_name())
                .flatten()
                .map(|n| n.to_string_lossy().into_owned())
        };

        let mut entries: Vec<DirEntry> = inner
            .directories
            .iter()
            .filter_map(|p| child_name(p).map(DirEntry::dir))
            .chain(
                inner
                    .files
                    .keys()
                    .filter_map(|p| child_name(p).map(DirEntry::file)),
            )
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
