//! Shell dispatch.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::config::{DEFAULT_TIMEOUT, MAX_OUTPUT_SIZE};

/// Limits applied to one shell dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellOptions {
    pub timeout: Duration,
    pub max_output_bytes: usize,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_output_bytes: MAX_OUTPUT_SIZE,
        }
    }
}

/// Captured output of a command that exited successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ShellOutput {
    /// Standard output, or standard error when stdout is empty.
    pub fn text(&self) -> &str {
        if self.stdout.is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }
}

/// Ways a shell dispatch can fail.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("command timed out after {}s", timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    #[error("output exceeded {limit} bytes")]
    OutputLimit { limit: usize },

    #[error("failed to spawn shell: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to read command output: {0}")]
    Read(#[source] std::io::Error),

    #[error("command exited with status {code}{}", stderr_suffix(stderr))]
    NonZeroExit { code: i32, stderr: String },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Runs a command line through a shell.
#[async_trait]
pub trait ShellDispatcher: Send + Sync {
    async fn run(&self, command: &str, options: &ShellOptions) -> Result<ShellOutput, ShellError>;
}

/// Dispatches through the platform shell: `sh -c` or `cmd /C`.
#[derive(Debug, Clone, Default)]
pub struct SystemShell {
    cwd: Option<PathBuf>,
}

impl SystemShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every command from `cwd` instead of the process directory.
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }

    fn command(&self, command_line: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command_line);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command_line);
            cmd
        };

        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true); // Clean up child process if we're dropped
        cmd
    }
}

#[async_trait]
impl ShellDispatcher for SystemShell {
    async fn run(&self, command: &str, options: &ShellOptions) -> Result<ShellOutput, ShellError> {
        let start = Instant::now();
        let mut child = self.command(command).spawn().map_err(ShellError::Spawn)?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();
        let limit = options.max_output_bytes;

        let result = tokio::time::timeout(options.timeout, async {
            let (stdout, stderr) = tokio::join!(
                read_capped(stdout_handle, limit),
                read_capped(stderr_handle, limit)
            );
            let (stdout, stderr) = (stdout?, stderr?);
            let status = child.wait().await;
            Ok::<_, ShellError>((stdout, stderr, status))
        })
        .await;

        let (stdout, stderr, status) = match result {
            Ok(Ok(captured)) => captured,
            Ok(Err(err)) => {
                let _ = child.kill().await;
                return Err(err);
            }
            Err(_) => {
                // Timeout - kill the process
                let _ = child.kill().await;
                return Err(ShellError::Timeout {
                    timeout: options.timeout,
                });
            }
        };

        let duration = start.elapsed();
        let exit_code = status.map(|s| s.code().unwrap_or(-1)).unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&stdout).into_owned();
        let stderr = String::from_utf8_lossy(&stderr).into_owned();

        tracing::debug!(command, exit_code, ?duration, "shell command finished");

        if exit_code != 0 {
            return Err(ShellError::NonZeroExit {
                code: exit_code,
                stderr,
            });
        }

        Ok(ShellOutput {
            stdout,
            stderr,
            duration,
        })
    }
}

/// Reads a stream to the end, failing once it goes past `limit` bytes.
pub(crate) async fn read_capped<R>(handle: Option<R>, limit: usize) -> Result<Vec<u8>, ShellError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let Some(handle) = handle else {
        return Ok(buf);
    };

    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    handle
        .take(cap)
        .read_to_end(&mut buf)
        .await
        .map_err(ShellError::Read)?;
    if buf.len() > limit {
        Err(ShellError::OutputLimit { limit })
    } else {
        Ok(buf)
    }
}
