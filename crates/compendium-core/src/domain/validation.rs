use crate::domain::{entities::ArtifactPlan, error::DomainError, layout};

/// What a validated name will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Project,
    Study,
}

impl NameKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Study => "study",
        }
    }
}

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    /// Names become directory and file names, so they must be a single
    /// portable path segment.
    pub fn validate_name(kind: NameKind, name: &str) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidName {
            kind: kind.as_str(),
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.starts_with('.') {
            return Err(invalid("name cannot start with '.'"));
        }
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(invalid("name cannot contain path separators or '..'"));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(invalid(&format!("character '{c}' is not allowed")));
        }
        if kind == NameKind::Study && layout::is_reserved(name) {
            return Err(DomainError::ReservedName {
                kind: kind.as_str(),
                name: name.to_string(),
            });
        }

        Ok(())
    }

    pub fn validate_plan(plan: &ArtifactPlan) -> Result<(), DomainError> {
        plan.validate()
    }
}
