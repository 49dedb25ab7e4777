//! Errors surfaced by the `compendium` binary.
//!
//! Core failures arrive as [`ScaffoldError`] and are wrapped unchanged; the
//! CLI adds its own failures (bad flags, unreadable settings) and decides
//! how each one is printed and which exit status it produces.

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use compendium_core::error::{ErrorCategory as CoreCategory, ScaffoldError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Arguments that parse but make no sense together.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Settings file or environment could not be read, parsed or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    #[error("Unknown configuration key '{key}'")]
    UnknownConfigKey { key: String },

    #[error("Scaffolding failed: {0}")]
    Core(#[from] ScaffoldError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// How an error is classified for the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid names, conflicts, or a folder that is not a project.
    UserError,
    NotFound,
    Configuration,
    Internal,
}

impl CliError {
    /// Next steps shown under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Run with --help to see the accepted arguments".into()],
            Self::ConfigError { .. } => vec![
                format!(
                    "Check the settings file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Environment overrides look like COMPENDIUM_DEFAULTS__MODE=scripted".into(),
                "Run 'compendium config init --force' to start from the defaults".into(),
            ],
            Self::UnknownConfigKey { .. } => vec![format!(
                "Known keys: {}",
                crate::commands::config::KEYS.join(", ")
            )],
            Self::Core(core) => core.suggestions(),
            Self::IoError { .. } => vec![
                "Check that you can write to the target folder".into(),
                "Re-running the same command keeps what was already written".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::UnknownConfigKey { .. } => ErrorCategory::NotFound,
            Self::Core(core) => match core.category() {
                // A missing project marker means the user pointed at the
                // wrong folder, so it is a usage error like a conflict.
                CoreCategory::Validation | CoreCategory::Conflict | CoreCategory::NotFound => {
                    ErrorCategory::UserError
                }
                CoreCategory::Io | CoreCategory::External | CoreCategory::Internal => {
                    ErrorCategory::Internal
                }
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Internal => 1,
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
        }
    }

    /// Error text for a terminal that understands ANSI colours.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.report(verbose).render(true)
    }

    /// Error text without escape codes, for pipes and `NO_COLOR`.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.report(verbose).render(false)
    }

    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, "{self}")
            }
        }
        for cause in self.causes() {
            tracing::debug!("caused by: {cause}");
        }
    }

    fn causes(&self) -> Vec<String> {
        std::iter::successors(self.source(), |&err| err.source())
            .map(ToString::to_string)
            .collect()
    }

    fn report(&self, verbose: bool) -> ErrorReport {
        let written = match self {
            Self::Core(core) => core.completed().iter().map(|s| s.path.clone()).collect(),
            _ => Vec::new(),
        };
        ErrorReport {
            headline: self.to_string(),
            causes: if verbose { self.causes() } else { Vec::new() },
            written,
            suggestions: self.suggestions(),
            hint_verbose: !verbose,
        }
    }
}

/// The pieces of an error message, before styling.
struct ErrorReport {
    headline: String,
    causes: Vec<String>,
    /// Paths a partial run managed to write.
    written: Vec<String>,
    suggestions: Vec<String>,
    hint_verbose: bool,
}

impl ErrorReport {
    fn render(&self, color: bool) -> String {
        let heading = |text: &str| {
            if color {
                text.yellow().bold().to_string()
            } else {
                text.to_string()
            }
        };
        let faint = |text: &str| {
            if color {
                text.dimmed().to_string()
            } else {
                text.to_string()
            }
        };

        let mut out = if color {
            format!("\n{} {}\n", "✗ Error:".red().bold(), self.headline.red())
        } else {
            format!("\nError: {}\n", self.headline)
        };

        for cause in &self.causes {
            out.push_str(&format!("  Caused by: {}\n", faint(cause)));
        }

        if !self.written.is_empty() {
            out.push_str(&format!("\n{}\n", heading("Already written:")));
            for path in &self.written {
                out.push_str(&format!("  {}\n", faint(path)));
            }
        }

        if !self.suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", heading("Suggestions:")));
            for suggestion in &self.suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }

        if self.hint_verbose {
            out.push_str(&format!("\n{}\n", faint("Use -v / --verbose for more details.")));
        }

        out
    }
}

/// Attach a context message while converting into [`CliError`].
///
/// Implemented for the two error types handlers actually see; a blanket
/// impl would overlap both.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, ScaffoldError> {
    /// Core errors already name the path; the message is only logged.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| {
            tracing::debug!(context = %f().into(), "core operation failed");
            CliError::Core(e)
        })
    }
}
