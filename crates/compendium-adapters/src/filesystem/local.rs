//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;
use walkdir::WalkDir;

use compendium_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem},
    },
    error::{ScaffoldError, ScaffoldResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ScaffoldResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    /// Writes to a temporary sibling and renames it over the target, so a
    /// crash never leaves a truncated file behind.
    fn write_file(&self, path: &Path, content: &str) -> ScaffoldResult<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp =
            NamedTempFile::new_in(parent).map_err(|e| map_io_error(path, e, "create temp file for"))?;
        temp.write_all(content.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| map_io_error(path, e, "write"))?;

        // Temp files are created owner-only; keep the target's mode, or use
        // the usual 0644 for new files.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(path)
                .map(|m| m.permissions().mode())
                .unwrap_or(0o644);
            temp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(mode))
                .map_err(|e| map_io_error(path, e, "set permissions on"))?;
        }

        temp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace"))?;

        trace!(path = %path.display(), bytes = content.len(), "File written");
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> ScaffoldResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_dir(&self, path: &Path) -> ScaffoldResult<Vec<DirEntry>> {
        let mut entries = Vec::new();

        for walk_entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let walk_entry = walk_entry.map_err(|e| {
                let reason = e.to_string();
                ApplicationError::io(path, "list", reason)
            })?;
            entries.push(DirEntry {
                name: walk_entry.file_name().to_string_lossy().into_owned(),
                is_dir: walk_entry.file_type().is_dir(),
            });
        }

        Ok(entries)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &'static str) -> ScaffoldError {
    ApplicationError::io(path, operation, e).into()
}
