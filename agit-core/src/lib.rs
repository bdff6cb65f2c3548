//! agit core - read-only repository browsing on top of the git CLI
//!
//! This crate lists repositories, enumerates commits, shows commit detail,
//! renders diffs and walks trees by running fixed git queries and decoding
//! their line oriented output into validated records.

pub mod config;
pub mod error;
pub mod git;
pub mod schema;
pub mod storage;

pub use config::Config;
pub use error::{Error, ExecutionError, Result, ValidationError};
pub use git::{
    CommandRunner, GitCommandRunner, GitDataAdapter, RepositoryDescriptor, RepositoryPathResolver,
};
pub use schema::{
    CommitDetail, CommitSummary, Decoration, DecorationKind, Diff, Hash, TreeEntry, TreePath,
    HASH_LENGTH,
};
pub use storage::{FileSystem, LiveFileSystem};

/// Re-exported so callers can cancel operations without depending on tokio-util
pub use tokio_util::sync::CancellationToken;
