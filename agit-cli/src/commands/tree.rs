//! Tree and blob commands

use agit_core::{GitDataAdapter, TreePath};
use clap::Subcommand;

use super::Output;

#[derive(Subcommand, Debug)]
pub enum TreeCommand {
    /// List the entries of a directory at a given revision
    Tree {
        /// Repository name
        repo: String,

        /// Branch, tag or commit
        #[arg(default_value = "HEAD")]
        treeish: String,

        /// Directory inside the repository (root when omitted)
        #[arg(default_value = "")]
        path: String,
    },

    /// Print the raw contents of an object
    Blob {
        /// Repository name
        repo: String,

        /// Object id, or `<rev>:<path>`
        object: String,
    },
}

impl TreeCommand {
    /// Execute the tree command
    pub async fn execute(&self, adapter: &GitDataAdapter, output: &Output) -> anyhow::Result<()> {
        match self {
            TreeCommand::Tree {
                repo,
                treeish,
                path,
            } => {
                let path = TreePath::decode(path.trim_end_matches('/'))?;
                let entries = adapter.list_tree_entries(repo, treeish, &path).await?;
                output.emit(&entries, |entries| {
                    for entry in entries {
                        let name = entry.path.file_name().unwrap_or_default();
                        let suffix = if entry.is_tree() { "/" } else { "" };
                        println!(
                            "{} {:<6} {} {}{}",
                            entry.mode, entry.object_type, entry.object, name, suffix
                        );
                    }
                })
            }
            TreeCommand::Blob { repo, object } => {
                let contents = adapter.get_blob(repo, object).await?;
                output.emit(&contents, |contents| print!("{}", contents))
            }
        }
    }
}
