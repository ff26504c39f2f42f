//! External process execution with a hard timeout
//!
//! Expected failures (missing binary, timeout, spawn errors) are encoded in the
//! returned [`ProcessOutput`] exit code rather than returned as errors.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Exit code reported when the executable cannot be found
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit code reported when the invocation exceeds its timeout
pub const EXIT_TIMEOUT: i32 = 124;
/// Exit code reported for any other spawn or wait failure
pub const EXIT_SPAWN_FAILED: i32 = 126;
/// Exit code reported when the child was terminated by a signal
pub const EXIT_SIGNALED: i32 = -1;

/// A fully-resolved command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; inherits the caller's when `None`
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, cwd: Option<PathBuf>) -> Self {
        self.cwd = cwd;
        self
    }
}

/// Captured result of running an [`Invocation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    fn failure(exit_code: i32, stderr: String) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr,
        }
    }
}

/// Capability for running external commands
///
/// Implementations must block (asynchronously) until the command exits or the
/// timeout fires, and must never retry.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation, timeout: Duration) -> ProcessOutput;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation, timeout: Duration) -> ProcessOutput {
        let program = &invocation.program;
        debug!("Running {program} {:?}", invocation.args);

        let mut command = Command::new(program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("{program} not found");
                return ProcessOutput::failure(EXIT_NOT_FOUND, format!("{program} not found: {e}"));
            }
            Err(e) => {
                warn!("Failed to spawn {program}: {e}");
                return ProcessOutput::failure(EXIT_SPAWN_FAILED, e.to_string());
            }
        };

        // Dropping the wait future on timeout drops the child, which kills it
        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Err(_) => {
                warn!("{program} timed out after {}s", timeout.as_secs());
                ProcessOutput::failure(
                    EXIT_TIMEOUT,
                    format!("{program} timed out after {}s", timeout.as_secs()),
                )
            }
            Ok(Err(e)) => {
                warn!("Failed to wait for {program}: {e}");
                ProcessOutput::failure(EXIT_SPAWN_FAILED, e.to_string())
            }
            Ok(Ok(output)) => {
                let exit_code = output.status.code().unwrap_or(EXIT_SIGNALED);
                debug!("{program} exited with {exit_code}");
                ProcessOutput {
                    exit_code,
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }
            }
        }
    }
}
