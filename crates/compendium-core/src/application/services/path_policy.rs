//! Resolution of project and study roots, with conflict checks.
//!
//! Every check here runs before the first mutation, so a rejected call
//! leaves the filesystem exactly as it found it.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{OverwritePolicy, ProjectConfig, layout},
    error::ScaffoldResult,
};

/// A concrete directory and whether it was already there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    pub path: PathBuf,
    pub existed: bool,
}

pub struct PathPolicy<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> PathPolicy<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Project directory for an `init` call.
    ///
    /// An existing project directory is not a conflict: re-running `init`
    /// is how an interrupted scaffold gets completed. Only a plain file
    /// squatting on the target path is rejected.
    pub fn resolve_project(&self, config: &ProjectConfig) -> ScaffoldResult<ResolvedRoot> {
        let path = config.project_root();

        if self.filesystem.exists(&path) && !self.filesystem.is_dir(&path) {
            return Err(ApplicationError::AlreadyExists { path }.into());
        }

        let existed = self.filesystem.is_dir(&path);
        debug!(path = %path.display(), existed, "Resolved project root");
        Ok(ResolvedRoot { path, existed })
    }

    /// Name of the project rooted at `root`, read off its project file.
    ///
    /// With several project files the first by name wins.
    pub fn find_project_marker(&self, root: &Path) -> ScaffoldResult<String> {
        let no_marker = || ApplicationError::NoProjectMarker {
            root: root.to_path_buf(),
        };

        if !self.filesystem.is_dir(root) {
            return Err(no_marker().into());
        }

        self.filesystem
            .list_dir(root)?
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .find_map(|entry| {
                entry
                    .name
                    .strip_suffix(layout::PROJECT_FILE_EXTENSION)
                    .and_then(|stem| stem.strip_suffix('.'))
                    .filter(|stem| !stem.is_empty())
                    .map(str::to_owned)
            })
            .ok_or_else(|| no_marker().into())
    }

    /// Study directory for an `add-study` call.
    ///
    /// A study exists once its processing document does. A directory left
    /// by an interrupted run has no processing document yet and is reused.
    pub fn resolve_study(
        &self,
        project_root: &Path,
        name: &str,
        policy: OverwritePolicy,
    ) -> ScaffoldResult<ResolvedRoot> {
        let path = project_root.join(layout::study_root(name).as_path());

        let complete = layout::processing_candidates(name)
            .iter()
            .any(|doc| self.filesystem.exists(&project_root.join(doc.as_path())));

        if complete && !policy.overwrites() {
            return Err(ApplicationError::AlreadyExists { path }.into());
        }
        if self.filesystem.exists(&path) && !self.filesystem.is_dir(&path) {
            return Err(ApplicationError::AlreadyExists { path }.into());
        }

        let existed = self.filesystem.is_dir(&path);
        debug!(path = %path.display(), existed, complete, "Resolved study root");
        Ok(ResolvedRoot { path, existed })
    }
}
