// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside partial-failure reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("'{name}' is reserved and cannot be used as a {kind} name")]
    ReservedName { kind: &'static str, name: String },

    #[error("Unknown authoring mode '{0}'")]
    InvalidMode(String),

    // ========================================================================
    // Plan Errors
    // ========================================================================
    #[error("Duplicate path in artifact plan: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Artifact plan is empty")]
    EmptyPlan,

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidName { kind, name, reason } => vec![
                format!("The {} name '{}' is invalid: {}", kind, name, reason),
                "Use letters, digits, '.', '-' and '_' only".into(),
                "Examples: pilot, study-2, replication_01".into(),
            ],
            Self::ReservedName { name, .. } => vec![
                format!("'{}' is used by the project layout itself", name),
                "Reserved names: writeup, literature, .git".into(),
            ],
            Self::InvalidMode(mode) => vec![
                format!("'{}' is not an authoring mode", mode),
                "Use 'literate' (Quarto documents) or 'scripted' (plain R scripts)".into(),
            ],
            Self::DuplicatePath { .. } | Self::AbsolutePathNotAllowed { .. } | Self::EmptyPlan => {
                vec!["This is a bug in the built-in layout, please report it".into()]
            }
            Self::MissingRequiredField { field } => {
                vec![format!("Provide a value for '{}'", field)]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName { .. }
            | Self::ReservedName { .. }
            | Self::InvalidMode(_)
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::DuplicatePath { .. } | Self::AbsolutePathNotAllowed { .. } | Self::EmptyPlan => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Internal,
}
