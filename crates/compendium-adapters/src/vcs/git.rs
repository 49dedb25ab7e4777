//! `git` invoked as a child process.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, instrument};

use compendium_core::{
    application::{ApplicationError, ports::VcsRunner},
    error::ScaffoldResult,
};

#[derive(Debug, Error)]
enum GitError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },
}

/// Runs git with an explicit working directory per call; the process's own
/// current directory is never changed.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: PathBuf,
}

impl GitRunner {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific binary instead of `git` from `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn execute(&self, workdir: &Path, args: &[String]) -> Result<(), GitError> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(workdir)
            .output()
            .map_err(|source| GitError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for GitRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsRunner for GitRunner {
    #[instrument(skip(self), fields(workdir = %workdir.display()))]
    fn run(&self, workdir: &Path, args: &[String]) -> ScaffoldResult<()> {
        self.execute(workdir, args)
            .map_err(|e| ApplicationError::VcsFailed {
                command: args.join(" "),
                reason: e.to_string(),
            })?;
        debug!("git command succeeded");
        Ok(())
    }
}
