//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "scaffold a project" or "add a study".

pub mod materializer;
pub mod path_policy;
pub mod scaffold_service;

pub use materializer::ArtifactMaterializer;
pub use path_policy::{PathPolicy, ResolvedRoot};
pub use scaffold_service::{
    AddStudyRequest, IndexOutcome, InitOptions, ModeSource, STUDIES_HEADING, ScaffoldReport,
    ScaffoldService, ScaffoldWarning, VcsOutcome,
};
