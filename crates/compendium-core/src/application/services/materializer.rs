//! Create-if-absent materialization of artifact plans.
//!
//! A file that already exists is never read or touched under
//! [`OverwritePolicy::KeepExisting`]; this is what keeps user edits safe
//! across repeated runs.

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{Artifact, ArtifactKind, ArtifactPlan, ArtifactStatus, Outcome, OverwritePolicy},
    error::ScaffoldResult,
};

/// Writes artifacts below a project root through the [`Filesystem`] port.
pub struct ArtifactMaterializer<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> ArtifactMaterializer<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Materialize a single artifact.
    ///
    /// Directories that already exist are a no-op success. Files that exist
    /// are skipped unless the policy overwrites.
    pub fn materialize(
        &self,
        root: &Path,
        artifact: &Artifact,
        policy: OverwritePolicy,
    ) -> ScaffoldResult<Outcome> {
        let path = root.join(artifact.path.as_path());

        let outcome = match artifact.kind {
            ArtifactKind::Directory => {
                if self.filesystem.is_dir(&path) {
                    Outcome::Skipped
                } else {
                    self.filesystem.create_dir_all(&path)?;
                    Outcome::Written
                }
            }
            ArtifactKind::File => {
                if self.filesystem.exists(&path) && !policy.overwrites() {
                    Outcome::Skipped
                } else {
                    if let Some(parent) = path.parent() {
                        if !self.filesystem.is_dir(parent) {
                            self.filesystem.create_dir_all(parent)?;
                        }
                    }
                    let content = artifact.content.as_deref().unwrap_or_default();
                    self.filesystem.write_file(&path, content)?;
                    Outcome::Written
                }
            }
        };

        debug!(path = %artifact.path, kind = %artifact.kind, %outcome, "Materialized");
        Ok(outcome)
    }

    /// Materialize a whole plan: every directory first, then every file in
    /// plan order.
    ///
    /// Stops at the first failure and returns
    /// [`ApplicationError::PartialFailure`] listing what was completed.
    pub fn materialize_all(
        &self,
        root: &Path,
        plan: &ArtifactPlan,
        policy: OverwritePolicy,
    ) -> ScaffoldResult<Vec<ArtifactStatus>> {
        self.materialize_in_passes(root, plan, policy, |_| {})
    }

    /// [`materialize_all`](Self::materialize_all), calling `on_pass` once the
    /// directory pass and again once the file pass has finished.
    #[instrument(skip_all, fields(root = %root.display(), artifacts = plan.len(), %policy))]
    pub fn materialize_in_passes(
        &self,
        root: &Path,
        plan: &ArtifactPlan,
        policy: OverwritePolicy,
        mut on_pass: impl FnMut(ArtifactKind),
    ) -> ScaffoldResult<Vec<ArtifactStatus>> {
        let mut completed = Vec::with_capacity(plan.len());

        for (kind, artifacts) in [
            (ArtifactKind::Directory, plan.directories().collect::<Vec<_>>()),
            (ArtifactKind::File, plan.files().collect()),
        ] {
            for artifact in artifacts {
                match self.materialize(root, artifact, policy) {
                    Ok(outcome) => completed.push(ArtifactStatus::new(artifact, outcome)),
                    Err(source) => {
                        warn!(path = %artifact.path, error = %source, "Materialization stopped");
                        return Err(ApplicationError::PartialFailure {
                            completed,
                            source: Box::new(source),
                        }
                        .into());
                    }
                }
            }
            on_pass(kind);
        }

        Ok(completed)
    }

    /// What [`materialize_all`](Self::materialize_all) would do, without
    /// touching anything.
    pub fn preview(
        &self,
        root: &Path,
        plan: &ArtifactPlan,
        policy: OverwritePolicy,
    ) -> Vec<ArtifactStatus> {
        plan.directories()
            .chain(plan.files())
            .map(|artifact| {
                let path = root.join(artifact.path.as_path());
                let present = match artifact.kind {
                    ArtifactKind::Directory => self.filesystem.is_dir(&path),
                    ArtifactKind::File => self.filesystem.exists(&path) && !policy.overwrites(),
                };
                let outcome = if present {
                    Outcome::Skipped
                } else {
                    Outcome::Written
                };
                ArtifactStatus::new(artifact, outcome)
            })
            .collect()
    }
}
