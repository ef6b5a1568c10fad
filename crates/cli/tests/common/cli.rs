//! CLI command execution helpers
//!
//! `mrsync` runs until it fails or is interrupted, so commands are spawned and
//! polled. A `tick` callback runs on every poll, letting a test keep touching
//! the source tree until the process reacts.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// CLI command builder
pub struct MrsyncCommand {
    binary_path: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    timeout: Duration,
}

impl MrsyncCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_mrsync")),
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Run to completion
    pub fn execute(&self) -> Result<CommandResult> {
        self.execute_with(|| {})
    }

    /// Run to completion, calling `tick` while the process is alive
    ///
    /// The process is killed when the timeout passes.
    pub fn execute_with(&self, mut tick: impl FnMut()) -> Result<CommandResult> {
        let start = Instant::now();

        let mut child = Command::new(&self.binary_path)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn mrsync")?;

        // Drain both pipes while polling so a chatty child never blocks on write
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let mut timed_out = false;
        while child.try_wait()?.is_none() {
            if start.elapsed() > self.timeout {
                child.kill()?;
                timed_out = true;
                break;
            }
            tick();
            thread::sleep(POLL_INTERVAL);
        }

        let status = child.wait().context("Failed to wait for mrsync")?;

        Ok(CommandResult {
            stdout: collect(stdout)?,
            stderr: collect(stderr)?,
            exit_code: status.code().unwrap_or(-1),
            timed_out,
            duration: start.elapsed(),
        })
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() || result.timed_out {
            anyhow::bail!(
                "Command should have failed:\nArgs: {:?}\nStdout: {}\nStderr: {}",
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn collect(reader: JoinHandle<Vec<u8>>) -> Result<String> {
    let bytes = reader
        .join()
        .map_err(|_| anyhow::anyhow!("Output reader panicked"))?;
    Ok(String::from_utf8_lossy(&bytes).to_string())
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub timed_out: bool,
    pub duration: Duration,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }
}
