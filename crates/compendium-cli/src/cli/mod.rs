//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use compendium_core::domain::AuthoringMode;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "compendium",
    bin_name = "compendium",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scaffold reproducible research compendia",
    long_about = "Compendium lays out a versionable research project \
                  (literature, write-up, studies) and keeps the README's \
                  study list in sync as studies are added.",
    after_help = "EXAMPLES:\n\
        \x20 compendium init demo --study pilot\n\
        \x20 compendium init --here --mode scripted --git\n\
        \x20 compendium add-study followup --root demo\n\
        \x20 compendium completions bash > /usr/share/bash-completion/completions/compendium",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a research project skeleton.
    #[command(
        about = "Create a research project",
        after_help = "EXAMPLES:\n\
            \x20 compendium init demo                 # ./demo\n\
            \x20 compendium init demo --study pilot   # with a first study\n\
            \x20 compendium init --here               # use the current folder\n\
            \x20 compendium init demo --dry-run       # show what would be written"
    )]
    Init(InitArgs),

    /// Add a study to an existing project.
    #[command(
        visible_alias = "study",
        about = "Add a study to a project",
        after_help = "EXAMPLES:\n\
            \x20 compendium add-study followup\n\
            \x20 compendium add-study replication --root ../demo --mode scripted\n\
            \x20 compendium add-study followup --git"
    )]
    AddStudy(AddStudyArgs),

    /// Manage the compendium configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 compendium config get defaults.mode\n\
            \x20 compendium config list\n\
            \x20 compendium config init"
    )]
    Config(ConfigCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 compendium completions bash > ~/.local/share/bash-completion/completions/compendium\n\
            \x20 compendium completions zsh  > ~/.zfunc/_compendium\n\
            \x20 compendium completions fish > ~/.config/fish/completions/compendium.fish"
    )]
    Completions(CompletionsArgs),
}

impl Commands {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::AddStudy(_) => "add-study",
            Self::Config(_) => "config",
            Self::Completions(_) => "completions",
        }
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `compendium init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name.  Required unless `--here` is given, in which case the
    /// folder name is used.
    #[arg(
        value_name = "NAME",
        required_unless_present = "here",
        help = "Project name"
    )]
    pub name: Option<String>,

    /// Use the root directory itself as the project directory.
    #[arg(long = "here", help = "Scaffold into the root directory itself")]
    pub here: bool,

    /// Directory the project is created in (default: current directory).
    #[arg(
        long = "root",
        value_name = "DIR",
        help = "Directory to create the project in"
    )]
    pub root: Option<PathBuf>,

    /// Create a first study alongside the project.
    #[arg(long = "study", value_name = "NAME", help = "Create a first study")]
    pub study: Option<String>,

    /// Authoring mode of the project's studies.
    #[arg(long = "mode", value_enum, value_name = "MODE", help = "Authoring mode")]
    pub mode: Option<ModeArg>,

    /// Replace the content of files that already exist.
    #[arg(long = "overwrite", help = "Replace existing files")]
    pub overwrite: bool,

    /// Initialise a git repository and commit the skeleton.
    #[arg(long = "git", help = "Initialise git and commit")]
    pub git: bool,

    /// Open the project in the system's default application afterwards.
    #[arg(long = "open", help = "Open the project when done")]
    pub open: bool,

    /// Preview what would be written without touching the disk.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── add-study ─────────────────────────────────────────────────────────────────

/// Arguments for `compendium add-study`.
#[derive(Debug, Args)]
pub struct AddStudyArgs {
    /// Study name.
    #[arg(value_name = "NAME", help = "Study name")]
    pub name: String,

    /// Project root (default: current directory).
    #[arg(long = "root", value_name = "DIR", help = "Project root directory")]
    pub root: Option<PathBuf>,

    /// Authoring mode; inferred from the existing studies when omitted.
    #[arg(long = "mode", value_enum, value_name = "MODE", help = "Authoring mode")]
    pub mode: Option<ModeArg>,

    /// Replace the content of files that already exist.
    #[arg(long = "overwrite", help = "Replace existing files")]
    pub overwrite: bool,

    /// Commit the new study when the project is a git repository.
    #[arg(long = "git", help = "Commit the new study")]
    pub git: bool,

    /// Preview what would be written without touching the disk.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `compendium completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `compendium config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.mode`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
    /// Write a configuration file with the default values.
    Init {
        /// Overwrite an existing config file.
        #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
        force: bool,
    },
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Authoring mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ModeArg {
    /// Quarto documents; also accepted as `quarto`.
    #[value(alias = "quarto")]
    Literate,
    /// Plain R scripts; also accepted as `script`.
    #[value(alias = "script")]
    Scripted,
}

impl From<ModeArg> for AuthoringMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Literate => Self::Literate,
            ModeArg::Scripted => Self::Scripted,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init_command() {
        let cli = Cli::parse_from(["compendium", "init", "demo", "--study", "pilot"]);
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.name.as_deref(), Some("demo"));
                assert_eq!(args.study.as_deref(), Some("pilot"));
                assert!(!args.here);
            }
            other => panic!("expected Init, got {other:?}"),
        }
    }

    #[test]
    fn init_requires_name_or_here() {
        assert!(Cli::try_parse_from(["compendium", "init"]).is_err());
        assert!(Cli::try_parse_from(["compendium", "init", "--here"]).is_ok());
    }

    #[test]
    fn mode_aliases() {
        let cli = Cli::parse_from(["compendium", "add-study", "x", "--mode", "quarto"]);
        if let Commands::AddStudy(args) = cli.command {
            assert_eq!(args.mode, Some(ModeArg::Literate));
            assert_eq!(AuthoringMode::from(ModeArg::Scripted), AuthoringMode::Scripted);
        } else {
            panic!("expected AddStudy command");
        }
    }

    #[test]
    fn study_alias_for_add_study() {
        let cli = Cli::parse_from(["compendium", "study", "followup"]);
        assert!(matches!(cli.command, Commands::AddStudy(_)));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["compendium", "--quiet", "--verbose", "config", "path"]);
        assert!(result.is_err());
    }
}
