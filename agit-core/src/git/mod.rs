//! Git operations for agit
//!
//! This module turns repository names into git invocations and git output
//! into typed records. Git itself is only ever reached through
//! [`CommandRunner`], and only read-only queries are issued.

mod adapter;
mod resolver;
mod runner;

pub use adapter::{GitDataAdapter, RepositoryDescriptor};
pub use resolver::{RepositoryPathResolver, DESCRIPTION_FILE};
pub use runner::{CommandRunner, GitCommandRunner};
