//! Core domain layer for compendium.
//!
//! Pure logic with no I/O: the project layout, artifact plans, template
//! rendering, mode detection and README section patching. Everything that
//! touches the filesystem or spawns a process goes through the ports defined
//! in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Deterministic**: Rendering never reads the clock or the environment
//! - **Immutable entities**: Configuration values are built once per call
pub mod entities;
pub mod error;
pub mod layout;
pub mod mode_detector;
pub mod plan;
pub mod templates;
pub mod value_objects;

mod validation;

pub use entities::{
    Artifact, ArtifactPlan, ArtifactStatus, HeadingPattern, IndexDocument, LicenseInfo,
    PatchStatus, ProjectConfig, ProjectConfigBuilder, ProjectLocation, RelativePath, Section,
    SectionPatch, StudyUnit,
};
pub use error::{DomainError, ErrorCategory};
pub use layout::StudyDocument;
pub use mode_detector::{DetectedMode, StudyListing};
pub use templates::{RenderContext, StudySummary};
pub use validation::{DomainValidator, NameKind};
pub use value_objects::{ArtifactKind, AuthoringMode, Outcome, OverwritePolicy};
