//! Terminal output for command results.
//!
//! Human and plain output go to stdout. In JSON mode stdout carries only the
//! JSON document, so status lines move to stderr. Warnings always use stderr.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use compendium_core::{
    application::ScaffoldReport,
    domain::{ArtifactKind, ArtifactStatus, Outcome},
};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Kind of one-line message, which picks its symbol and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Plain,
    Header,
    Success,
    Info,
    Warning,
}

impl Tone {
    fn paint(self, msg: &str, color: bool) -> String {
        let symbol = match self {
            Tone::Plain | Tone::Header => None,
            Tone::Success => Some("\u{2713}"),
            Tone::Info => Some("\u{2139}"),
            Tone::Warning => Some("\u{26a0}"),
        };

        match (symbol, color) {
            (None, false) => msg.to_owned(),
            (Some(symbol), false) => format!("{symbol} {msg}"),
            (_, true) => match self {
                Tone::Plain => msg.to_owned(),
                Tone::Header => msg.cyan().bold().to_string(),
                Tone::Success => format!("{} {}", "\u{2713}".green().bold(), msg.green()),
                Tone::Info => format!("{} {}", "\u{2139}".blue().bold(), msg.blue()),
                Tone::Warning => format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow()),
            },
        }
    }
}

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    color: bool,
    stdout: Term,
    stderr: Term,
}

impl OutputManager {
    /// The `--output-format` flag wins; `output.format` from the config only
    /// replaces `auto`. Whatever is still `auto` becomes Human on a terminal
    /// and Plain otherwise.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => parse_format(&config.output.format),
            explicit => explicit,
        };
        let format = match requested {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            resolved => resolved,
        };

        Self {
            format,
            quiet: args.quiet,
            color: format == OutputFormat::Human && !args.no_color && !config.output.no_color,
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.say(Tone::Plain, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.say(Tone::Header, text)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.say(Tone::Success, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.say(Tone::Info, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.say(Tone::Warning, msg)
    }

    /// Pretty JSON on stdout. Not silenced by `--quiet`.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.stdout.write_line(&rendered)
    }

    /// Print the `{path, kind, action}` summary of a scaffold run, then its
    /// warnings.
    ///
    /// Paths are relative to the project root. Only the human format names
    /// the absolute root, as a header above the table.
    pub fn report(&self, report: &ScaffoldReport) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            self.json(&report.statuses)?;
        } else if !self.quiet {
            if self.format == OutputFormat::Human {
                self.header(&report.project_root.display().to_string())?;
            }
            for line in self.status_table(&report.statuses) {
                self.stdout.write_line(&line)?;
            }
        }

        for warning in &report.warnings {
            self.warning(&warning.to_string())?;
        }
        Ok(())
    }

    pub fn supports_color(&self) -> bool {
        self.color
    }

    /// The resolved format; never `Auto`.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn say(&self, tone: Tone, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let term = if tone == Tone::Warning || self.format == OutputFormat::Json {
            &self.stderr
        } else {
            &self.stdout
        };
        term.write_line(&tone.paint(msg, self.color))
    }

    fn status_table(&self, statuses: &[ArtifactStatus]) -> Vec<String> {
        let header = format!("{:<8} {:<9} {}", "ACTION", "KIND", "PATH");
        let rows = statuses.iter().map(|status| {
            let action = format!("{:<8}", status.action.to_string());
            let action = match (self.color, status.action) {
                (false, _) => action,
                (true, Outcome::Written) => action.green().to_string(),
                (true, Outcome::Skipped) => action.dimmed().to_string(),
            };
            let slash = if status.kind == ArtifactKind::Directory { "/" } else { "" };
            format!("{action} {:<9} {}{slash}", status.kind.to_string(), status.path)
        });
        std::iter::once(header).chain(rows).collect()
    }
}

fn parse_format(value: &str) -> OutputFormat {
    match value.trim().to_ascii_lowercase().as_str() {
        "human" => OutputFormat::Human,
        "plain" => OutputFormat::Plain,
        "json" => OutputFormat::Json,
        _ => OutputFormat::Auto,
    }
}
