//! Tracing subscriber setup for the `compendium` binary.
//!
//! The library crates emit events only; this module decides where they go.
//! Everything is written to stderr so stdout stays reserved for command
//! results (the status table or the JSON array).
//!
//! `-q` maps to `error`, no flag to `warn`, then `-v`/`-vv`/`-vvv` step
//! through `info`, `debug` and `trace`. A `RUST_LOG` value replaces the
//! computed filter entirely.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

/// Crates whose events are shown at the computed level.
const TARGETS: &[&str] = &["compendium", "compendium_core", "compendium_adapters"];

/// What the subscriber should look like, derived from the global flags.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    level: &'static str,
    /// JSON lines instead of the compact text format.
    json: bool,
    ansi: bool,
}

impl LogSettings {
    fn from_args(args: &GlobalArgs) -> Self {
        let level = match (args.quiet, args.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        };
        let json = args.output_format == OutputFormat::Json;
        Self {
            level,
            json,
            ansi: !json && !args.no_color && std::io::stderr().is_terminal(),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directives()))
    }

    fn directives(&self) -> String {
        TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber. Call once, before the first event.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let settings = LogSettings::from_args(args);

    let base = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // The two formats are different layer types, so each branch installs its own.
    let installed = if settings.json {
        tracing_subscriber::registry()
            .with(settings.filter())
            .with(base.json().with_current_span(false))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(settings.filter())
            .with(base.compact().with_ansi(settings.ansi))
            .try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}
