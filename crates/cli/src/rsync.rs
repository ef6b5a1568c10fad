//! rsync invocation
//!
//! The sync action handed to the watcher. rsync runs from inside the source
//! directory and mirrors `.` to the remote, so exclusions are passed through
//! exactly as the user wrote them (relative to the source).

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::debug;
use watcher::MonitorConfig;

/// Errors from running rsync
#[derive(Error, Debug)]
pub enum RsyncError {
    /// rsync could not be started
    #[error("failed to run rsync: {0}")]
    Spawn(#[from] std::io::Error),

    /// rsync ran and reported failure
    #[error("rsync exited with {status}")]
    Failed { status: ExitStatus },
}

/// One configured rsync invocation, reusable for every sync
#[derive(Debug, Clone)]
pub struct Rsync {
    program: OsString,
    source: PathBuf,
    remote: String,
    excludes: Vec<String>,
    dry_run: bool,
}

impl Rsync {
    pub fn new(source: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            program: OsString::from("rsync"),
            source: source.into(),
            remote: remote.into(),
            excludes: vec![],
            dry_run: false,
        }
    }

    pub fn from_config(source: &Path, remote: &str, config: &MonitorConfig) -> Self {
        Self::new(source, remote)
            .excludes(config.exclusions())
            .dry_run(config.dry_run)
    }

    pub fn excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Use another executable in place of `rsync`
    pub fn program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "--archive",
            "--delete",
            "--human-readable",
            "--verbose",
            "--update",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        if self.dry_run {
            args.push("--dry-run".to_string());
        }
        for exclude in &self.excludes {
            args.push("--exclude".to_string());
            args.push(exclude.clone());
        }
        args.push(".".to_string());
        args.push(self.remote.clone());

        args
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args()).current_dir(&self.source);
        command
    }

    /// Run rsync to completion, output going straight to the terminal
    pub fn run(&self) -> Result<(), RsyncError> {
        let mut command = self.command();
        debug!("rsync command: {:?}", command);

        let status = command.status()?;
        if !status.success() {
            return Err(RsyncError::Failed { status });
        }
        Ok(())
    }
}
