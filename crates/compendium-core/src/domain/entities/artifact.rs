use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::common::RelativePath,
    error::DomainError,
    value_objects::{ArtifactKind, Outcome},
};

/// One unit of materialization work.
///
/// Artifacts carry no identity beyond their path: the path IS the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: RelativePath,
    pub kind: ArtifactKind,
    /// Rendered text; `None` for directories.
    pub content: Option<String>,
}

impl Artifact {
    pub fn directory(path: RelativePath) -> Self {
        Self {
            path,
            kind: ArtifactKind::Directory,
            content: None,
        }
    }

    pub fn file(path: RelativePath, content: impl Into<String>) -> Self {
        Self {
            path,
            kind: ArtifactKind::File,
            content: Some(content.into()),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == ArtifactKind::Directory
    }
}

/// Ordered set of artifacts ready for materialization.
///
/// This is the output of the template rendering process.
/// It contains no business logic, only data.
#[derive(Debug, Clone, Default)]
pub struct ArtifactPlan {
    pub(crate) artifacts: Vec<Artifact>,
}

impl ArtifactPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_directory(&mut self, path: RelativePath) {
        self.artifacts.push(Artifact::directory(path));
    }

    pub fn add_file(&mut self, path: RelativePath, content: impl Into<String>) {
        self.artifacts.push(Artifact::file(path, content));
    }

    pub fn with_directory(mut self, path: RelativePath) -> Self {
        self.add_directory(path);
        self
    }

    pub fn with_file(mut self, path: RelativePath, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    /// Append another plan, keeping order.
    pub fn extend(&mut self, other: ArtifactPlan) {
        self.artifacts.extend(other.artifacts);
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.artifacts.is_empty() {
            return Err(DomainError::EmptyPlan);
        }

        let mut seen = HashSet::new();
        for artifact in &self.artifacts {
            let path = artifact.path.as_path();

            if path.is_absolute() {
                return Err(DomainError::AbsolutePathNotAllowed {
                    path: path.display().to_string(),
                });
            }

            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath {
                    path: artifact.path.to_portable(),
                });
            }
        }

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    pub fn files(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(|a| !a.is_directory())
    }

    pub fn directories(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(|a| a.is_directory())
    }

    pub fn get(&self, path: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.path.to_portable() == path)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl IntoIterator for ArtifactPlan {
    type Item = Artifact;
    type IntoIter = std::vec::IntoIter<Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.into_iter()
    }
}

/// Per-artifact line of a scaffold report: `{path, kind, action}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStatus {
    /// Portable path relative to the project root.
    pub path: String,
    pub kind: ArtifactKind,
    pub action: Outcome,
}

impl ArtifactStatus {
    pub fn new(artifact: &Artifact, action: Outcome) -> Self {
        Self {
            path: artifact.path.to_portable(),
            kind: artifact.kind,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_orders_and_counts() {
        let plan = ArtifactPlan::new()
            .with_directory("writeup".into())
            .with_file("README.md".into(), "# demo\n");

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.files().count(), 1);
        assert_eq!(plan.directories().count(), 1);
        assert!(plan.get("README.md").is_some());
    }

    #[test]
    fn plan_rejects_duplicates() {
        let plan = ArtifactPlan::new()
            .with_file("LICENSE".into(), "")
            .with_file("LICENSE".into(), "");

        assert!(matches!(
            plan.validate(),
            Err(DomainError::DuplicatePath { .. })
        ));
    }

    #[test]
    fn plan_rejects_empty() {
        assert_eq!(ArtifactPlan::new().validate(), Err(DomainError::EmptyPlan));
    }
}
