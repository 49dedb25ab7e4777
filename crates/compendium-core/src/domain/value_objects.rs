//! Small value types shared across the domain.
//!
//! All of them are `Copy`, have a stable lowercase `Display` form, and parse
//! from the same strings the CLI and config file accept.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// How a study's code is authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthoringMode {
    /// Narrative and code interleaved in Quarto documents.
    #[default]
    Literate,
    /// Plain R scripts driven by a run-all entry point.
    Scripted,
}

impl AuthoringMode {
    /// File extension of the documents this mode produces.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Literate => "qmd",
            Self::Scripted => "R",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Literate => "literate",
            Self::Scripted => "scripted",
        }
    }

    /// Whether a file extension belongs to this mode. Case-insensitive.
    pub fn recognises(self, extension: &str) -> bool {
        match self {
            Self::Literate => {
                extension.eq_ignore_ascii_case("qmd") || extension.eq_ignore_ascii_case("rmd")
            }
            Self::Scripted => extension.eq_ignore_ascii_case("r"),
        }
    }
}

impl fmt::Display for AuthoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthoringMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literate" | "quarto" | "qmd" => Ok(Self::Literate),
            "scripted" | "script" | "r" => Ok(Self::Scripted),
            other => Err(DomainError::InvalidMode(other.to_string())),
        }
    }
}

/// What to do when a file artifact is already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwritePolicy {
    /// Leave existing files untouched. User edits survive re-runs.
    #[default]
    KeepExisting,
    /// Replace file contents with freshly rendered text.
    Overwrite,
}

impl OverwritePolicy {
    pub const fn from_flag(overwrite: bool) -> Self {
        if overwrite {
            Self::Overwrite
        } else {
            Self::KeepExisting
        }
    }

    pub const fn overwrites(self) -> bool {
        matches!(self, Self::Overwrite)
    }
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepExisting => f.write_str("keep-existing"),
            Self::Overwrite => f.write_str("overwrite"),
        }
    }
}

/// Kind of filesystem artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Directory,
    File,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => f.write_str("directory"),
            Self::File => f.write_str("file"),
        }
    }
}

/// Result of materializing one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Written,
    Skipped,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written => f.write_str("written"),
            Self::Skipped => f.write_str("skipped"),
        }
    }
}
