//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `COMPENDIUM_` prefix, `__` between key segments,
//!    e.g. `COMPENDIUM_DEFAULTS__MODE=scripted`
//! 3. Config file (`--config`, or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Datelike;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use compendium_core::domain::{AuthoringMode, LicenseInfo};

const ENV_PREFIX: &str = "COMPENDIUM";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for `init` and `add-study` flags.
    pub defaults: Defaults,
    /// LICENSE rendering.
    pub license: LicenseConfig,
    /// Generated file settings.
    pub templates: TemplateConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Mode for new projects. Studies infer theirs from the project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<AuthoringMode>,
    /// First study `init` creates when `--study` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study: Option<String>,
    pub git: bool,
    pub open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
    /// Copyright holder; "The Authors" when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Keep fitted models and large outputs out of git.
    pub ignore_large_outputs: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            ignore_large_outputs: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration by layering file and environment over defaults.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        let defaults = Config::try_from(&Self::default())
            .context("Failed to serialise built-in defaults")?;

        let layered = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        layered
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.compendium.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "compendium", "compendium")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".compendium.toml"))
    }

    /// The file in effect: `--config` when given, otherwise the default.
    pub fn active_path(config_file: Option<&Path>) -> PathBuf {
        config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path)
    }

    /// Copyright data for the LICENSE, dated with the current year.
    pub fn license_info(&self) -> LicenseInfo {
        let holder = self
            .license
            .holder
            .clone()
            .unwrap_or_else(|| LicenseInfo::default().holder);
        LicenseInfo::new(holder, chrono::Local::now().year())
    }

    /// Default mode, falling back to the core default.
    pub fn default_mode(&self) -> AuthoringMode {
        self.defaults.mode.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_literate() {
        assert_eq!(AppConfig::default().default_mode(), AuthoringMode::Literate);
    }

    #[test]
    fn large_outputs_ignored_by_default() {
        assert!(AppConfig::default().templates.ignore_large_outputs);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\nmode = \"scripted\"\nstudy = \"pilot\"\n\n[license]\nholder = \"Jane Doe\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.default_mode(), AuthoringMode::Scripted);
        assert_eq!(cfg.defaults.study.as_deref(), Some("pilot"));
        assert_eq!(cfg.license_info().holder, "Jane Doe");
        // Untouched sections keep their defaults.
        assert!(cfg.templates.ignore_large_outputs);
        assert!(!cfg.defaults.git);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn invalid_mode_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nmode = \"latex\"\n").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let rendered = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn license_holder_falls_back() {
        let info = AppConfig::default().license_info();
        assert_eq!(info.holder, LicenseInfo::default().holder);
        assert!(info.year >= 2024);
    }

    #[test]
    fn active_path_prefers_explicit_file() {
        let explicit = Path::new("/tmp/compendium.toml");
        assert_eq!(AppConfig::active_path(Some(explicit)), explicit);
        assert_eq!(AppConfig::active_path(None), AppConfig::config_path());
    }
}
