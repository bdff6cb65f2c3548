//! CLI command implementations

pub mod history;
pub mod output;
pub mod repository;
pub mod tree;

pub use history::HistoryCommand;
pub use output::Output;
pub use repository::RepositoryCommand;
pub use tree::TreeCommand;
