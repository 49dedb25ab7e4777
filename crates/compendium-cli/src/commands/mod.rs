//! Command handlers.
//!
//! Each handler translates parsed arguments into core requests, calls the
//! core service, and hands the result to the [`OutputManager`](crate::output::OutputManager).
//! No business logic lives here.

use std::path::{Path, PathBuf};

use compendium_adapters::{GitRunner, LocalFilesystem, NoopOpener, SystemOpener};
use compendium_core::application::{IdeOpener, ScaffoldService};

use crate::error::{CliError, CliResult, IntoCli};

pub mod add_study;
pub mod completions;
pub mod config;
pub mod init;

/// Wire the production adapters into a [`ScaffoldService`].
fn scaffold_service(open: bool) -> ScaffoldService {
    let opener: Box<dyn IdeOpener> = if open {
        Box::new(SystemOpener::new())
    } else {
        Box::new(NoopOpener)
    };
    ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(GitRunner::new()),
        opener,
    )
}

/// `--root` made absolute against the current directory.
///
/// A root that does not exist yet is accepted; `init` creates it.
fn resolve_root(root: Option<&Path>) -> CliResult<PathBuf> {
    let cwd = std::env::current_dir().with_cli_context(|| "Failed to read the current directory")?;
    let resolved = match root {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd,
    };
    if resolved.is_file() {
        return Err(CliError::InvalidInput {
            message: format!("--root {} is a file, not a folder", resolved.display()),
        });
    }
    Ok(resolved)
}
