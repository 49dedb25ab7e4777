//! Per-invocation configuration values.
//!
//! [`ProjectConfig`] and [`StudyUnit`] are created once per call and never
//! mutated afterwards; all durable state lives on the filesystem.

use std::path::{Path, PathBuf};

use crate::domain::{
    entities::common::RelativePath,
    error::DomainError,
    layout,
    validation::{DomainValidator, NameKind},
    value_objects::{AuthoringMode, OverwritePolicy},
};

/// Where the project lives relative to the root the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectLocation {
    /// The project occupies the root directory itself.
    CurrentDir,
    /// The project gets its own namespaced folder under the root.
    Subdirectory,
}

impl ProjectLocation {
    /// Concrete project directory for `root` and `name`.
    pub fn resolve(&self, root: &Path, name: &str) -> PathBuf {
        match self {
            Self::CurrentDir => root.to_path_buf(),
            Self::Subdirectory => root.join(name),
        }
    }
}

/// Copyright line data for the generated LICENSE.
///
/// Supplied by the caller so rendering never reads the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseInfo {
    pub holder: String,
    pub year: i32,
}

impl LicenseInfo {
    pub fn new(holder: impl Into<String>, year: i32) -> Self {
        Self {
            holder: holder.into(),
            year,
        }
    }
}

impl Default for LicenseInfo {
    fn default() -> Self {
        Self::new("The Authors", 1970)
    }
}

/// Immutable configuration for one `init` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    root: PathBuf,
    location: ProjectLocation,
    project_name: String,
    authoring_mode: AuthoringMode,
    overwrite_policy: OverwritePolicy,
    license: LicenseInfo,
    ignore_large_outputs: bool,
}

impl ProjectConfig {
    pub fn builder(root: impl Into<PathBuf>) -> ProjectConfigBuilder {
        ProjectConfigBuilder::new(root)
    }

    /// The root the caller supplied (not necessarily the project directory).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolved project directory.
    pub fn project_root(&self) -> PathBuf {
        self.location.resolve(&self.root, &self.project_name)
    }

    pub fn location(&self) -> &ProjectLocation {
        &self.location
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn authoring_mode(&self) -> AuthoringMode {
        self.authoring_mode
    }

    pub fn overwrite_policy(&self) -> OverwritePolicy {
        self.overwrite_policy
    }

    pub fn license(&self) -> &LicenseInfo {
        &self.license
    }

    pub fn ignore_large_outputs(&self) -> bool {
        self.ignore_large_outputs
    }
}

/// Builder for [`ProjectConfig`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ProjectConfigBuilder {
    root: PathBuf,
    name: Option<String>,
    location: ProjectLocation,
    authoring_mode: AuthoringMode,
    overwrite_policy: OverwritePolicy,
    license: LicenseInfo,
    ignore_large_outputs: bool,
}

impl ProjectConfigBuilder {
    fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            name: None,
            location: ProjectLocation::Subdirectory,
            authoring_mode: AuthoringMode::default(),
            overwrite_policy: OverwritePolicy::default(),
            license: LicenseInfo::default(),
            ignore_large_outputs: true,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Place the project directly in the root instead of `root/<name>`.
    pub fn in_current_dir(mut self) -> Self {
        self.location = ProjectLocation::CurrentDir;
        self
    }

    pub fn authoring_mode(mut self, mode: AuthoringMode) -> Self {
        self.authoring_mode = mode;
        self
    }

    pub fn overwrite_policy(mut self, policy: OverwritePolicy) -> Self {
        self.overwrite_policy = policy;
        self
    }

    pub fn license(mut self, license: LicenseInfo) -> Self {
        self.license = license;
        self
    }

    pub fn ignore_large_outputs(mut self, ignore: bool) -> Self {
        self.ignore_large_outputs = ignore;
        self
    }

    pub fn build(self) -> Result<ProjectConfig, DomainError> {
        let project_name = match (self.name, &self.location) {
            (Some(name), _) => name,
            // In the current directory the folder name doubles as project name.
            (None, ProjectLocation::CurrentDir) => self
                .root
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_owned)
                .ok_or(DomainError::MissingRequiredField {
                    field: "project name",
                })?,
            (None, ProjectLocation::Subdirectory) => {
                return Err(DomainError::MissingRequiredField {
                    field: "project name",
                });
            }
        };

        DomainValidator::validate_name(NameKind::Project, &project_name)?;

        Ok(ProjectConfig {
            root: self.root,
            location: self.location,
            project_name,
            authoring_mode: self.authoring_mode,
            overwrite_policy: self.overwrite_policy,
            license: self.license,
            ignore_large_outputs: self.ignore_large_outputs,
        })
    }
}

/// One study inside a project.
///
/// Identity is the name: two studies with the same name conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyUnit {
    name: String,
    relative_root: RelativePath,
    authoring_mode: AuthoringMode,
}

impl StudyUnit {
    pub fn new(name: impl Into<String>, mode: AuthoringMode) -> Result<Self, DomainError> {
        let name = name.into();
        DomainValidator::validate_name(NameKind::Study, &name)?;
        Ok(Self {
            relative_root: layout::study_root(&name),
            name,
            authoring_mode: mode,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `studies/<name>` relative to the project root.
    pub fn relative_root(&self) -> &RelativePath {
        &self.relative_root
    }

    pub fn authoring_mode(&self) -> AuthoringMode {
        self.authoring_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdirectory_project_gets_its_own_folder() {
        let cfg = ProjectConfig::builder("/work").name("demo").build().unwrap();
        assert_eq!(cfg.project_root(), PathBuf::from("/work/demo"));
        assert_eq!(cfg.location(), &ProjectLocation::Subdirectory);
    }

    #[test]
    fn current_dir_project_occupies_root_and_takes_its_name() {
        let cfg = ProjectConfig::builder("/work/demo")
            .in_current_dir()
            .build()
            .unwrap();
        assert_eq!(cfg.project_root(), PathBuf::from("/work/demo"));
        assert_eq!(cfg.project_name(), "demo");
    }

    #[test]
    fn current_dir_with_explicit_name_keeps_root() {
        let cfg = ProjectConfig::builder("/work/checkout")
            .in_current_dir()
            .name("demo")
            .build()
            .unwrap();
        assert_eq!(cfg.project_root(), PathBuf::from("/work/checkout"));
        assert_eq!(cfg.project_name(), "demo");
    }

    #[test]
    fn subdirectory_requires_name() {
        assert!(matches!(
            ProjectConfig::builder("/work").build(),
            Err(DomainError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn invalid_project_name_is_rejected() {
        assert!(ProjectConfig::builder("/work").name("a/b").build().is_err());
    }

    #[test]
    fn study_root_is_under_studies() {
        let study = StudyUnit::new("pilot", AuthoringMode::Literate).unwrap();
        assert_eq!(study.relative_root().to_portable(), "studies/pilot");
    }

    #[test]
    fn reserved_study_name_is_rejected() {
        assert!(matches!(
            StudyUnit::new("writeup", AuthoringMode::Literate),
            Err(DomainError::ReservedName { .. })
        ));
    }
}
