//! Error types for agit

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for agit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Raw text that did not match the shape a decoder expects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} (input: {input:?})")]
pub struct ValidationError {
    /// The offending raw input
    pub input: String,
    /// Human readable reason
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error for the given raw input
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of an external process invocation
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The process could not be started
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        /// Executable that was invoked
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process exited with a non-zero status
    #[error("'{program} {args}' exited with status {}: {stderr}", exit_code(.code))]
    Failed {
        /// Executable that was invoked
        program: String,
        /// Space-joined argument list
        args: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// Reading the process output failed
    #[error("Failed to read output of '{program}': {source}")]
    Output {
        /// Executable that was invoked
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process exceeded the configured deadline
    #[error("'{program}' timed out after {timeout:?}")]
    TimedOut {
        /// Executable that was invoked
        program: String,
        /// The deadline that elapsed
        timeout: Duration,
    },
}

fn exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "<signal>".to_string(), |c| c.to_string())
}

/// Error type for agit operations
#[derive(Error, Debug)]
pub enum Error {
    /// Command output or file contents did not decode
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// External command failure
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Filesystem access failure
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Repository name rejected by the path resolver
    #[error("Invalid repository name: {0:?}")]
    InvalidRepositoryName(String),

    /// The operation was cancelled before it completed
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an IO error with the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is the cancellation outcome
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
