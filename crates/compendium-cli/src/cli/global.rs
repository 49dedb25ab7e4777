//! Flags accepted by every `compendium` subcommand.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// More log output: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never colour output (also set by NO_COLOR)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Read settings from FILE instead of the user config directory
    #[arg(short, long, global = true, env = "COMPENDIUM_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How results are printed
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,
}

/// Rendering of command results.
///
/// `Auto` defers to `output.format` in the config file, then to whether
/// stdout is a terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Auto,
    /// Coloured text with the project root header
    Human,
    /// Text without colour
    Plain,
    /// Status array on stdout, messages on stderr
    Json,
}
