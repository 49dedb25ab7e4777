//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `compendium-adapters` crate provides implementations.

use std::path::Path;

use crate::error::ScaffoldResult;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `compendium_adapters::filesystem::LocalFilesystem` (production)
/// - `compendium_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths are absolute: the services join the resolved project root with the
/// relative artifact paths before calling in.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ScaffoldResult<()>;

    /// Replace the file's content.
    ///
    /// Must not leave an empty or truncated file behind when it fails.
    fn write_file(&self, path: &Path, content: &str) -> ScaffoldResult<()>;

    fn read_to_string(&self, path: &Path) -> ScaffoldResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Immediate children of a directory, sorted by name.
    fn list_dir(&self, path: &Path) -> ScaffoldResult<Vec<DirEntry>>;
}

/// Port for the version-control binary.
///
/// Implemented by `compendium_adapters::vcs::GitRunner`.
#[cfg_attr(test, mockall::automock)]
pub trait VcsRunner: Send + Sync {
    /// Run one command with `workdir` as its working directory.
    ///
    /// Any non-zero exit is an error; callers treat it as non-fatal.
    fn run(&self, workdir: &Path, args: &[String]) -> ScaffoldResult<()>;
}

/// Port for opening a project file in an editor. Fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait IdeOpener: Send + Sync {
    fn open(&self, path: &Path) -> ScaffoldResult<()>;
}
