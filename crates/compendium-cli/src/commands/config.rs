//! `compendium config`: inspect and create the configuration file.

use std::path::Path;

use serde_json::Value;

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Every key `config get` understands.
pub const KEYS: &[&str] = &[
    "defaults.mode",
    "defaults.study",
    "defaults.git",
    "defaults.open",
    "license.holder",
    "templates.ignore_large_outputs",
    "output.no_color",
    "output.format",
];

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<&Path>,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(config, &key)?;
            if output.format() == OutputFormat::Json {
                output.json(&value)?;
            } else {
                output.print(&display_value(&value))?;
            }
        }

        ConfigCommands::List => {
            if output.format() == OutputFormat::Json {
                output.json(config)?;
            } else {
                output.header("Current Configuration:")?;
                let serialised =
                    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.print(serialised.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::active_path(config_file).display().to_string())?;
        }

        ConfigCommands::Init { force } => init_file(config_file, force, output)?,
    }

    Ok(())
}

/// Write the default configuration, unless a file is already there.
fn init_file(config_file: Option<&Path>, force: bool, output: &OutputManager) -> CliResult<()> {
    let config_path = AppConfig::active_path(config_file);

    if config_path.exists() && !force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    let toml = toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise default config: {e}"),
        source: Some(Box::new(e)),
    })?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(&config_path, toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", config_path.display()))?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display()
    ))?;
    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<Value> {
    if !KEYS.contains(&key) {
        return Err(CliError::UnknownConfigKey { key: key.into() });
    }

    let tree = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;

    // Unset optional keys are omitted from the serialized tree.
    Ok(key
        .split('.')
        .try_fold(&tree, |node, segment| node.get(segment))
        .cloned()
        .unwrap_or(Value::Null))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "(unset)".into(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
