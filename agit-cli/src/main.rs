//! agit CLI - Command line interface for the agit repository browser
//!
//! Browses bare repositories under a storage directory without modifying them.

mod commands;

use std::path::PathBuf;

use agit_core::{CancellationToken, Config, GitDataAdapter};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{HistoryCommand, Output, RepositoryCommand, TreeCommand};

/// agit: read-only repository browser
#[derive(Parser, Debug)]
#[command(name = "agit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the repositories (overrides config and env)
    #[arg(long, global = true, env = "AGIT_REPOSITORY_STORAGE")]
    storage: Option<PathBuf>,

    /// Path to git executable (overrides config and env)
    #[arg(long, global = true, env = "AGIT_GIT_PATH")]
    git_path: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Show current configuration
    Config,

    #[command(flatten)]
    Repository(RepositoryCommand),

    #[command(flatten)]
    History(HistoryCommand),

    #[command(flatten)]
    Tree(TreeCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout stays parseable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.storage.clone(), cli.git_path.clone())?;

    tracing::debug!(
        storage = %config.storage.root.display(),
        git = %config.git.path,
        timeout = ?config.git.timeout,
        "Configuration loaded"
    );

    let output = Output::new(cli.json);

    match cli.command {
        Some(Commands::Version) => {
            println!("agit {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Config) => {
            println!("agit Configuration");
            println!("==================");
            println!();
            println!("Storage:");
            println!("  root: {}", config.storage.root.display());
            println!();
            println!("Git:");
            println!("  path: {}", config.git.path);
            match config.git.timeout {
                Some(timeout) => println!("  timeout: {:?}", timeout),
                None => println!("  timeout: (none)"),
            }
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        Some(Commands::Repository(command)) => {
            command.execute(&adapter(&config)?, &output).await?;
        }
        Some(Commands::History(command)) => {
            command.execute(&adapter(&config)?, &output).await?;
        }
        Some(Commands::Tree(command)) => {
            command.execute(&adapter(&config)?, &output).await?;
        }
        None => {
            println!("agit - read-only repository browser");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Build an adapter whose operations are cancelled on Ctrl-C
fn adapter(config: &Config) -> anyhow::Result<GitDataAdapter> {
    let cancel = CancellationToken::new();

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    Ok(GitDataAdapter::from_config(config)?.with_cancellation(cancel))
}
