//! Commit history commands

use agit_core::{CommitDetail, CommitSummary, DecorationKind, GitDataAdapter};
use clap::Subcommand;

use super::Output;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List commits reachable from HEAD, newest first
    Log {
        /// Repository name
        repo: String,

        /// Maximum number of commits to show
        #[arg(short = 'n', long, default_value_t = 20)]
        max_count: usize,

        /// Number of commits to skip
        #[arg(long, default_value_t = 0)]
        skip: usize,
    },

    /// Show metadata and message of a commit
    Show {
        /// Repository name
        repo: String,

        /// Commit hash or ref
        #[arg(default_value = "HEAD")]
        commit: String,
    },

    /// Show the patch introduced by a commit
    Diff {
        /// Repository name
        repo: String,

        /// Commit hash or ref
        #[arg(default_value = "HEAD")]
        commit: String,
    },
}

impl HistoryCommand {
    /// Execute the history command
    pub async fn execute(&self, adapter: &GitDataAdapter, output: &Output) -> anyhow::Result<()> {
        match self {
            HistoryCommand::Log {
                repo,
                max_count,
                skip,
            } => {
                let commits = adapter.list_commits(repo, *max_count, *skip).await?;
                output.emit(&commits, |commits| {
                    for commit in commits {
                        print_summary(commit);
                    }
                })
            }
            HistoryCommand::Show { repo, commit } => {
                let detail = adapter.get_commit_detail(repo, commit).await?;
                output.emit(&detail, print_detail)
            }
            HistoryCommand::Diff { repo, commit } => {
                let diff = adapter.get_diff(repo, commit).await?;
                output.emit(&diff, |diff| println!("{}", diff.as_str()))
            }
        }
    }
}

fn print_summary(commit: &CommitSummary) {
    let refs: Vec<String> = commit
        .decorations
        .iter()
        .map(|d| match d.kind {
            DecorationKind::Tag => format!("tag: {}", d.label),
            DecorationKind::Head | DecorationKind::Branch => d.label.clone(),
        })
        .collect();

    let refs = if refs.is_empty() {
        String::new()
    } else {
        format!(" ({})", refs.join(", "))
    };

    println!(
        "{} {} {:<20} {}{}",
        commit.hash,
        commit.date.format("%Y-%m-%d"),
        commit.author,
        commit.subject,
        refs
    );
}

fn print_detail(detail: &CommitDetail) {
    println!("commit {}", detail.hash);
    println!(
        "Author:    {} <{}>  {}",
        detail.author,
        detail.author_email,
        detail.author_date.format(DATE_FORMAT)
    );
    println!(
        "Committer: {} <{}>  {}",
        detail.committer,
        detail.committer_email,
        detail.committer_date.format(DATE_FORMAT)
    );
    if let Some(signer) = &detail.signer {
        println!(
            "Signed by: {} ({})",
            signer,
            detail.signature_key.as_deref().unwrap_or("unknown key")
        );
    }
    println!();
    println!("    {}", detail.subject);
    if !detail.body.trim().is_empty() {
        println!();
        for line in detail.body.trim_end().lines() {
            println!("    {}", line);
        }
    }
}
