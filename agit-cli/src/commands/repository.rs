//! Repository level commands

use agit_core::GitDataAdapter;
use clap::Subcommand;
use serde_json::json;

use super::Output;

#[derive(Subcommand, Debug)]
pub enum RepositoryCommand {
    /// List repositories under the storage directory
    #[command(visible_alias = "ls")]
    Repos,

    /// Check that a repository exists
    Exists {
        /// Repository name
        repo: String,
    },

    /// Print a repository's description
    Description {
        /// Repository name
        repo: String,
    },

    /// Count commits reachable from HEAD
    Count {
        /// Repository name
        repo: String,
    },
}

impl RepositoryCommand {
    /// Execute the repository command
    pub async fn execute(&self, adapter: &GitDataAdapter, output: &Output) -> anyhow::Result<()> {
        match self {
            RepositoryCommand::Repos => {
                let repositories = adapter.list_repositories().await?;
                output.emit(&repositories, |repositories| {
                    if repositories.is_empty() {
                        println!(
                            "No repositories found in {}",
                            adapter.resolver().root().display()
                        );
                        return;
                    }
                    let width = repositories.iter().map(|r| r.name.len()).max().unwrap_or(0);
                    for repository in repositories {
                        println!(
                            "{:width$}  {}",
                            repository.name,
                            repository.description.lines().next().unwrap_or(""),
                            width = width
                        );
                    }
                })
            }
            RepositoryCommand::Exists { repo } => {
                adapter.repository_exists(repo).await?;
                output.emit(&json!({ "name": repo, "exists": true }), |_| {
                    println!("{} exists", repo);
                })
            }
            RepositoryCommand::Description { repo } => {
                let description = adapter.get_description(repo).await?;
                output.emit(&description, |description| print!("{}", description))
            }
            RepositoryCommand::Count { repo } => {
                let count = adapter.count_commits(repo).await?;
                output.emit(&count, |count| println!("{}", count))
            }
        }
    }
}
