//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ArtifactStatus;
use crate::error::{ErrorCategory, ScaffoldError};

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Target study or project collides with existing content.
    #[error("Already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// add-study was pointed at a directory without a project file.
    #[error("No project file (*.Rproj) found in {root}")]
    NoProjectMarker { root: PathBuf },

    /// A filesystem operation failed.
    #[error("Failed to {operation} {path}: {reason}")]
    IoFailure {
        path: PathBuf,
        operation: &'static str,
        reason: String,
    },

    /// A mutation failed after earlier artifacts were written.
    ///
    /// `completed` lists what is already on disk; re-running with the
    /// keep-existing policy finishes the job.
    #[error("Scaffolding stopped after {} artifact(s): {source}", .completed.len())]
    PartialFailure {
        completed: Vec<ArtifactStatus>,
        #[source]
        source: Box<ScaffoldError>,
    },

    /// A version-control command exited unsuccessfully.
    #[error("`git {command}` failed: {reason}")]
    VcsFailed { command: String, reason: String },

    /// The IDE could not be launched.
    #[error("Could not open {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, reason: impl ToString) -> Self {
        Self::IoFailure {
            path: path.into(),
            operation,
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AlreadyExists { path } => vec![
                format!("Existing content at: {}", path.display()),
                "Pass --overwrite to regenerate its files (your other files are kept)".into(),
                "Or choose a different name".into(),
            ],
            Self::NoProjectMarker { root } => vec![
                format!("{} does not look like a compendium project", root.display()),
                "Run the command from the project root, or pass --root <DIR>".into(),
                "Create a project first with: compendium init <NAME>".into(),
            ],
            Self::IoFailure { path, .. } => vec![
                format!("Check permissions and free space for: {}", path.display()),
                "Fix the cause and re-run the same command to continue".into(),
            ],
            Self::PartialFailure { completed, source } => {
                let mut suggestions = vec![format!(
                    "{} artifact(s) were written before the failure and are kept",
                    completed.len()
                )];
                suggestions.extend(source.suggestions());
                suggestions.push("Re-running without --overwrite completes the job".into());
                suggestions
            }
            Self::VcsFailed { .. } => vec![
                "Check that git is installed and on your PATH".into(),
                "Your files were written; commit them manually".into(),
            ],
            Self::OpenFailed { path, .. } => {
                vec![format!("Open {} manually", path.display())]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::NoProjectMarker { .. } => ErrorCategory::NotFound,
            Self::IoFailure { .. } | Self::PartialFailure { .. } => ErrorCategory::Io,
            Self::VcsFailed { .. } | Self::OpenFailed { .. } => ErrorCategory::External,
        }
    }
}
