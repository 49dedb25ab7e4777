//! `compendium`: scaffold and grow reproducible research projects.
//!
//! `main` owns process concerns only. It reads `.env`, parses flags,
//! installs logging and loads settings. It then hands a [`Session`] to the
//! command modules and turns the outcome into an exit status:
//!
//! | Code | When                                                    |
//! |------|---------------------------------------------------------|
//! |  0   | the command finished, possibly with warnings            |
//! |  1   | I/O or other failure outside the user's control         |
//! |  2   | bad arguments, name conflicts, not inside a project     |
//! |  3   | `config get` with a key that does not exist             |
//! |  4   | the configuration file or environment could not be read |

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, instrument};

use crate::{
    cli::{Cli, Commands, ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

/// Everything a command needs besides its own arguments.
struct Session {
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
}

fn main() -> ExitCode {
    // Missing `.env` is normal.
    let _ = dotenvy::dotenv();

    let Cli { global, command } = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version text are not failures.
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    if let Err(e) = logging::init_logging(&global) {
        eprintln!("compendium: {e:#}");
        return ExitCode::from(1);
    }
    debug!(command = command.name(), verbose = global.verbose, "starting");

    let session = match open_session(global, &command) {
        Ok(session) => session,
        Err((err, global)) => return report_failure(&err, &global, !global.no_color),
    };

    let color = session.output.supports_color();
    match run(command, &session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err, &session.global, color),
    }
}

/// Load settings and build the output manager.
///
/// `config init` starts from the built-in defaults so it can replace a file
/// that no longer parses.
fn open_session(
    global: GlobalArgs,
    command: &Commands,
) -> Result<Session, (CliError, GlobalArgs)> {
    let loaded = match command {
        Commands::Config(ConfigCommands::Init { .. }) => Ok(AppConfig::default()),
        _ => AppConfig::load(global.config.as_ref()),
    };

    match loaded {
        Ok(config) => {
            let output = OutputManager::new(&global, &config);
            Ok(Session {
                global,
                config,
                output,
            })
        }
        Err(e) => Err((
            CliError::ConfigError {
                message: format!("{e:#}"),
                source: None,
            },
            global,
        )),
    }
}

#[instrument(skip_all, fields(command = command.name()))]
fn run(command: Commands, session: &Session) -> CliResult<()> {
    let Session {
        global,
        config,
        output,
    } = session;

    match command {
        Commands::Init(args) => commands::init::execute(args, config, output),
        Commands::AddStudy(args) => commands::add_study::execute(args, config, output),
        Commands::Config(cmd) => {
            commands::config::execute(cmd, global.config.as_deref(), config, output)
        }
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Log the error, print it on stderr and pick the exit status.
fn report_failure(err: &CliError, global: &GlobalArgs, color: bool) -> ExitCode {
    err.log();

    let verbose = global.verbose > 0;
    let message = if color && std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{message}");

    ExitCode::from(err.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn binary_reports_package_version() {
        assert_eq!(
            Cli::command().get_version(),
            Some(env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn subcommands_are_named_for_logging() {
        let cli = Cli::try_parse_from(["compendium", "add-study", "followup"]).unwrap();
        assert_eq!(cli.command.name(), "add-study");

        let cli = Cli::try_parse_from(["compendium", "config", "init"]).unwrap();
        assert_eq!(cli.command.name(), "config");
    }
}
