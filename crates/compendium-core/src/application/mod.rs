//! Application layer for compendium.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService and its helpers)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    AddStudyRequest, ArtifactMaterializer, IndexOutcome, InitOptions, ModeSource, PathPolicy,
    ScaffoldReport, ScaffoldService, ScaffoldWarning, VcsOutcome,
};

// Re-export port traits (for adapter implementation)
pub use ports::{DirEntry, Filesystem, IdeOpener, VcsRunner};

pub use error::ApplicationError;
