pub mod artifact;
pub mod common;
pub mod config;
pub mod index_document;

pub use crate::domain::DomainError;
pub use artifact::{Artifact, ArtifactPlan, ArtifactStatus};
pub use common::RelativePath;
pub use config::{LicenseInfo, ProjectConfig, ProjectConfigBuilder, ProjectLocation, StudyUnit};
pub use index_document::{HeadingPattern, IndexDocument, PatchStatus, Section, SectionPatch};
