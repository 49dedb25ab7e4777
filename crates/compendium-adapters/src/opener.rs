//! IDE openers.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use compendium_core::{
    application::{ApplicationError, ports::IdeOpener},
    error::ScaffoldResult,
};

/// Hands the project file to the desktop's default application.
///
/// The child is spawned and not waited for.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    pub fn new() -> Self {
        Self
    }

    fn command(path: &Path) -> Command {
        #[cfg(target_os = "macos")]
        let mut cmd = Command::new("open");
        #[cfg(target_os = "windows")]
        let mut cmd = {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        };
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let mut cmd = Command::new("xdg-open");

        cmd.arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl IdeOpener for SystemOpener {
    fn open(&self, path: &Path) -> ScaffoldResult<()> {
        Self::command(path).spawn().map_err(|e| ApplicationError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "Opener launched");
        Ok(())
    }
}

/// Opener that does nothing; used when opening is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOpener;

impl IdeOpener for NoopOpener {
    fn open(&self, path: &Path) -> ScaffoldResult<()> {
        debug!(path = %path.display(), "Open skipped");
        Ok(())
    }
}
