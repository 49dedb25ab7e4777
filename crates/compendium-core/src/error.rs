//! Unified error handling for compendium core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for compendium core operations.
#[derive(Debug, Error, Clone)]
pub enum ScaffoldError {
    /// Errors from the domain layer (business rule violations).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl ScaffoldError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in compendium".into(),
                "Please report it together with the command you ran".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Conflict => ErrorCategory::Conflict,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether re-running the same command can succeed.
    ///
    /// Filesystem failures leave a partially written tree that a
    /// keep-existing re-run completes.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(
                ApplicationError::IoFailure { .. } | ApplicationError::PartialFailure { .. }
            )
        )
    }

    /// Statuses of artifacts written before a partial failure.
    pub fn completed(&self) -> &[crate::domain::ArtifactStatus] {
        match self {
            Self::Application(ApplicationError::PartialFailure { completed, .. }) => completed,
            _ => &[],
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Io,
    External,
    Internal,
}

/// Convenient result type alias.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;
