//! External git process invocation

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::config::GitConfig;
use crate::{Error, ExecutionError, Result};

/// Runs a git command against a repository and captures its stdout
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `args` against the repository at `git_dir`
    ///
    /// Output is buffered whole. Cancelling `cancel` terminates the process
    /// and yields [`Error::Cancelled`].
    async fn run(
        &self,
        git_dir: &Path,
        args: &[String],
        cancel: &CancellationToken,
    ) -> Result<String>;
}

/// [`CommandRunner`] that spawns the git executable
#[derive(Debug, Clone)]
pub struct GitCommandRunner {
    git_path: String,
    timeout: Option<Duration>,
}

impl GitCommandRunner {
    /// Create a runner using `git` from PATH and no deadline
    pub fn new() -> Self {
        Self {
            git_path: "git".to_string(),
            timeout: None,
        }
    }

    /// Create a runner from the git section of the configuration
    pub fn from_config(config: &GitConfig) -> Self {
        Self {
            git_path: config.path.clone(),
            timeout: config.timeout,
        }
    }

    /// Set a custom path to the git executable
    pub fn with_git_path(mut self, path: impl Into<String>) -> Self {
        self.git_path = path.into();
        self
    }

    /// Bound every invocation by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the command for `args` against `git_dir`
    fn build_command(&self, git_dir: &Path, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.git_path);
        // Report non-ASCII paths verbatim so they can be passed back to git
        cmd.args(["-c", "core.quotePath=false"])
            .arg("--git-dir")
            .arg(git_dir)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for GitCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for GitCommandRunner {
    async fn run(
        &self,
        git_dir: &Path,
        args: &[String],
        cancel: &CancellationToken,
    ) -> Result<String> {
        tracing::debug!(git = %self.git_path, git_dir = %git_dir.display(), ?args, "Running git");

        let child = self.build_command(git_dir, args).spawn().map_err(|source| {
            ExecutionError::Spawn {
                program: self.git_path.clone(),
                source,
            }
        })?;

        // Dropping the pending wait drops the child, which kills it
        let wait = child.wait_with_output();
        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(?args, "git cancelled");
                return Err(Error::Cancelled);
            }
            result = with_deadline(wait, self.timeout) => match result {
                Some(output) => output,
                None => {
                    return Err(ExecutionError::TimedOut {
                        program: self.git_path.clone(),
                        timeout: self.timeout.unwrap_or_default(),
                    }
                    .into());
                }
            },
        };

        let output = output.map_err(|source| ExecutionError::Output {
            program: self.git_path.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(
                code = ?output.status.code(),
                %stderr,
                ?args,
                "git exited unsuccessfully"
            );
            return Err(ExecutionError::Failed {
                program: self.git_path.clone(),
                args: args.join(" "),
                code: output.status.code(),
                stderr,
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Await `future`, giving up after `timeout` when one is set
async fn with_deadline<F: std::future::Future>(
    future: F,
    timeout: Option<Duration>,
) -> Option<F::Output> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, future).await.ok(),
        None => Some(future.await),
    }
}
