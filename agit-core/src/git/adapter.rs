//! Read-only repository operations on top of the git CLI
//!
//! Each operation resolves the repository path, runs one fixed git query and
//! decodes its output with the matching [`schema`](crate::schema) decoder.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::resolver::RepositoryPathResolver;
use super::runner::{CommandRunner, GitCommandRunner};
use crate::config::Config;
use crate::schema::{CommitDetail, CommitSummary, Diff, TreeEntry, TreePath, HASH_LENGTH};
use crate::storage::{FileSystem, LiveFileSystem};
use crate::{Error, Result, ValidationError};

const SUMMARY_FORMAT: &str = "--format=%h%n%at%n%an%n%s%n%D";
const DETAIL_FORMAT: &str = "--format=%h%n%an%n%ae%n%at%n%cn%n%ce%n%ct%n%GS%n%GK%n%s%n%b";
const DIFF_FORMAT: &str = "--format=%N";
const TREE_FORMAT: &str = "--format=%(objectmode)%x09%(objecttype)%x09%(objectname)%x09%(path)";

/// A repository and its description file contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryDescriptor {
    /// Directory name under the storage root
    pub name: String,
    /// Raw contents of the `description` file
    pub description: String,
}

/// Read-only access to the repositories under a storage root
///
/// Cheap to clone; clones share the runner and filesystem. Use
/// [`with_cancellation`](Self::with_cancellation) to bind a clone to a
/// caller's cancellation token.
#[derive(Clone)]
pub struct GitDataAdapter {
    resolver: RepositoryPathResolver,
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FileSystem>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for GitDataAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitDataAdapter")
            .field("root", &self.resolver.root())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl GitDataAdapter {
    /// Create an adapter from explicit capabilities
    pub fn new(
        resolver: RepositoryPathResolver,
        runner: Arc<dyn CommandRunner>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            resolver,
            runner,
            fs,
            cancel: CancellationToken::new(),
        }
    }

    /// Create an adapter backed by the git CLI and the local filesystem
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            RepositoryPathResolver::from_config(&config.storage)?,
            Arc::new(GitCommandRunner::from_config(&config.git)),
            Arc::new(LiveFileSystem),
        ))
    }

    /// Return a copy whose operations abort when `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The path resolver in use
    pub fn resolver(&self) -> &RepositoryPathResolver {
        &self.resolver
    }

    /// List every repository under the storage root, sorted by name
    ///
    /// Descriptions are read concurrently. A single unreadable description
    /// fails the whole listing.
    pub async fn list_repositories(&self) -> Result<Vec<RepositoryDescriptor>> {
        let root = self.resolver.root().to_path_buf();
        let mut names = self.cancellable(self.fs.list_directories(&root)).await?;
        names.sort();

        let reads = names.into_iter().map(|name| async move {
            let description = self.get_description(&name).await.inspect_err(|e| {
                tracing::warn!(repository = %name, error = %e, "Failed to read description");
            })?;
            Ok::<_, Error>(RepositoryDescriptor { name, description })
        });

        let repositories = try_join_all(reads).await?;
        tracing::debug!(count = repositories.len(), "Listed repositories");
        Ok(repositories)
    }

    /// Succeeds if the named repository's directory is accessible
    pub async fn repository_exists(&self, name: &str) -> Result<()> {
        let path = self.resolver.resolve(name)?;
        self.cancellable(self.fs.access(&path)).await
    }

    /// Raw contents of the repository's description file
    pub async fn get_description(&self, name: &str) -> Result<String> {
        let path = self.resolver.description_path(name)?;
        self.cancellable(self.fs.read_to_string(&path)).await
    }

    /// Number of commits reachable from HEAD
    pub async fn count_commits(&self, name: &str) -> Result<u64> {
        let stdout = self.git(name, ["rev-list", "--count", "HEAD"]).await?;
        let first = stdout.split('\n').next().unwrap_or_default();
        first.trim().parse().map_err(|_| {
            ValidationError::new(first, "Commit count should be a non-negative integer").into()
        })
    }

    /// Up to `max_amount` commits from HEAD, newest first, skipping `offset`
    pub async fn list_commits(
        &self,
        name: &str,
        max_amount: usize,
        offset: usize,
    ) -> Result<Vec<CommitSummary>> {
        let stdout = self
            .git(
                name,
                [
                    "log".to_string(),
                    SUMMARY_FORMAT.to_string(),
                    abbrev(),
                    "--max-count".to_string(),
                    max_amount.to_string(),
                    "--skip".to_string(),
                    offset.to_string(),
                ],
            )
            .await?;

        let commits = CommitSummary::decode_all(&split_lines(&stdout))?;
        tracing::debug!(repository = name, count = commits.len(), "Decoded commits");
        Ok(commits)
    }

    /// Metadata and message of a single commit
    pub async fn get_commit_detail(&self, name: &str, commit: &str) -> Result<CommitDetail> {
        let stdout = self
            .git(
                name,
                [
                    "show".to_string(),
                    "-s".to_string(),
                    DETAIL_FORMAT.to_string(),
                    abbrev(),
                    revision(commit)?,
                ],
            )
            .await?;

        Ok(CommitDetail::decode(&split_lines(&stdout))?)
    }

    /// Patch introduced by a commit
    pub async fn get_diff(&self, name: &str, commit: &str) -> Result<Diff> {
        let stdout = self
            .git(
                name,
                ["show".to_string(), DIFF_FORMAT.to_string(), abbrev(), revision(commit)?],
            )
            .await?;

        // Padding lines are part of the expected shape, so no line splitting here
        Ok(Diff::decode(&stdout)?)
    }

    /// Entries of the tree at `path` within `treeish`; the root when `path` is empty
    pub async fn list_tree_entries(
        &self,
        name: &str,
        treeish: &str,
        path: &TreePath,
    ) -> Result<Vec<TreeEntry>> {
        let mut args = vec![
            "ls-tree".to_string(),
            TREE_FORMAT.to_string(),
            abbrev(),
            revision(treeish)?,
        ];
        if !path.is_root() {
            // Segments may start with `-`
            args.push("--".to_string());
            args.push(format!("{}/", path.encode()));
        }

        let stdout = self.git(name, args).await?;
        let entries = TreeEntry::decode_all(&split_lines(&stdout))?;
        tracing::debug!(repository = name, count = entries.len(), "Decoded tree entries");
        Ok(entries)
    }

    /// Raw contents of an object, returned verbatim
    pub async fn get_blob(&self, name: &str, object: &str) -> Result<String> {
        self.git(name, ["show".to_string(), revision(object)?]).await
    }

    async fn git<I, S>(&self, name: &str, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let git_dir: PathBuf = self.resolver.resolve(name)?;
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.runner.run(&git_dir, &args, &self.cancel).await
    }

    async fn cancellable<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            result = operation => result,
        }
    }
}

fn abbrev() -> String {
    format!("--abbrev={}", HASH_LENGTH)
}

/// Reject revisions git would parse as options
fn revision(rev: &str) -> Result<String> {
    if rev.is_empty() || rev.starts_with('-') {
        return Err(ValidationError::new(
            rev,
            "Revision should be a non-empty name not starting with `-`",
        )
        .into());
    }
    Ok(rev.to_string())
}

/// Split stdout into lines, dropping the empty element after a final newline
fn split_lines(stdout: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = stdout.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DecorationKind;
    use crate::ExecutionError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::Mutex;

    /// Replays canned stdout and records every invocation
    #[derive(Default)]
    struct ScriptedRunner {
        responses: Mutex<VecDeque<Result<String>>>,
        calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
    }

    impl ScriptedRunner {
        fn replying(stdout: &str) -> Arc<Self> {
            let runner = Self::default();
            runner.responses.lock().unwrap().push_back(Ok(stdout.to_string()));
            Arc::new(runner)
        }

        fn last_call(&self) -> (PathBuf, Vec<String>) {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(
            &self,
            git_dir: &Path,
            args: &[String],
            cancel: &CancellationToken,
        ) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((git_dir.to_path_buf(), args.to_vec()));
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn adapter(runner: Arc<ScriptedRunner>) -> GitDataAdapter {
        GitDataAdapter::new(
            RepositoryPathResolver::new("/srv/git").unwrap(),
            runner,
            Arc::new(LiveFileSystem),
        )
    }

    fn storage_adapter(root: &Path) -> GitDataAdapter {
        GitDataAdapter::new(
            RepositoryPathResolver::new(root).unwrap(),
            Arc::new(ScriptedRunner::default()),
            Arc::new(LiveFileSystem),
        )
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_revision_rejects_options() {
        assert!(revision("--output=/tmp/x").is_err());
        assert!(revision("").is_err());
        assert_eq!(revision("HEAD~1").unwrap(), "HEAD~1");
    }

    #[tokio::test]
    async fn test_count_commits() {
        let runner = ScriptedRunner::replying("42\n");
        let count = adapter(runner.clone()).count_commits("demo").await.unwrap();
        assert_eq!(count, 42);

        let (git_dir, args) = runner.last_call();
        assert_eq!(git_dir, PathBuf::from("/srv/git/demo"));
        assert_eq!(args, ["rev-list", "--count", "HEAD"]);
    }

    #[tokio::test]
    async fn test_count_commits_garbage() {
        let runner = ScriptedRunner::replying("lots\n");
        let err = adapter(runner).count_commits("demo").await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref v) if v.input == "lots"));
    }

    #[tokio::test]
    async fn test_list_commits() {
        let stdout = "aaaaaaaaaaaa\n1700000100\nAda\nSecond\nHEAD -> main\n\
                      bbbbbbbbbbbb\n1700000000\nGrace\nFirst\n\n";
        let runner = ScriptedRunner::replying(stdout);
        let commits = adapter(runner.clone()).list_commits("demo", 2, 4).await.unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].subject, "Second");
        assert_eq!(commits[0].decorations[0].kind, DecorationKind::Head);
        assert_eq!(commits[1].hash.as_str(), "bbbbbbbbbbbb");
        assert!(commits[1].decorations.is_empty());

        let (_, args) = runner.last_call();
        assert_eq!(
            args,
            [
                "log",
                "--format=%h%n%at%n%an%n%s%n%D",
                "--abbrev=12",
                "--max-count",
                "2",
                "--skip",
                "4"
            ]
        );
    }

    #[tokio::test]
    async fn test_list_commits_empty_page() {
        let runner = ScriptedRunner::replying("");
        let commits = adapter(runner).list_commits("demo", 10, 100).await.unwrap();
        assert!(commits.is_empty());
    }

    #[tokio::test]
    async fn test_get_commit_detail_with_body() {
        let stdout = "cccccccccccc\nAda\nada@example.com\n1700000000\nGrace\ngrace@example.com\n\
                      1700000060\n\n\nSubject\nBody one\nBody two\n\n";
        let runner = ScriptedRunner::replying(stdout);
        let detail = adapter(runner.clone())
            .get_commit_detail("demo", "cccccccccccc")
            .await
            .unwrap();

        assert_eq!(detail.subject, "Subject");
        assert_eq!(detail.body, "Body one\nBody two\n");
        assert!(detail.signer.is_none());

        let (_, args) = runner.last_call();
        assert_eq!(args[0], "show");
        assert_eq!(args[1], "-s");
        assert_eq!(args[2], DETAIL_FORMAT);
        assert_eq!(args[3], "--abbrev=12");
        assert_eq!(args[4], "cccccccccccc");
    }

    #[tokio::test]
    async fn test_get_diff() {
        let runner = ScriptedRunner::replying("\n\ndiff --git a/f b/f\n+added\n");
        let diff = adapter(runner.clone()).get_diff("demo", "HEAD").await.unwrap();
        assert_eq!(diff.as_str(), "diff --git a/f b/f\n+added");

        let (_, args) = runner.last_call();
        assert_eq!(args, ["show", "--format=%N", "--abbrev=12", "HEAD"]);
    }

    #[tokio::test]
    async fn test_get_diff_without_padding() {
        let runner = ScriptedRunner::replying("diff --git a/f b/f\n");
        let err = adapter(runner).get_diff("demo", "HEAD").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_tree_entries_root_and_subdir() {
        let runner = ScriptedRunner::replying("100644\tblob\t0123456789ab\tREADME.md\n");
        let entries = adapter(runner.clone())
            .list_tree_entries("demo", "main", &TreePath::root())
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        let (_, args) = runner.last_call();
        assert_eq!(args.len(), 4);
        assert_eq!(args[3], "main");

        let runner = ScriptedRunner::replying("100644\tblob\t0123456789ab\tsrc/lib.rs\n");
        let entries = adapter(runner.clone())
            .list_tree_entries("demo", "main", &TreePath::from_segments(["src"]))
            .await
            .unwrap();
        assert_eq!(entries[0].path.segments(), ["src", "lib.rs"]);
        let (_, args) = runner.last_call();
        assert_eq!(args[4..], ["--", "src/"]);
    }

    #[tokio::test]
    async fn test_get_blob_verbatim() {
        let runner = ScriptedRunner::replying("fn main() {}\n\n");
        let blob = adapter(runner.clone()).get_blob("demo", "0123456789ab").await.unwrap();
        assert_eq!(blob, "fn main() {}\n\n");
        assert_eq!(runner.last_call().1, ["show", "0123456789ab"]);
    }

    #[tokio::test]
    async fn test_execution_errors_pass_through() {
        let runner = Arc::new(ScriptedRunner::default());
        runner
            .responses
            .lock()
            .unwrap()
            .push_back(Err(ExecutionError::Failed {
                program: "git".to_string(),
                args: "log".to_string(),
                code: Some(128),
                stderr: "fatal: your current branch does not have any commits yet".to_string(),
            }
            .into()));

        let err = adapter(runner).list_commits("empty", 10, 0).await.unwrap_err();
        assert!(matches!(err, Error::Execution(ExecutionError::Failed { code: Some(128), .. })));
    }

    #[tokio::test]
    async fn test_invalid_repository_name_never_runs_git() {
        let runner = Arc::new(ScriptedRunner::default());
        let err = adapter(runner.clone()).count_commits("../etc").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRepositoryName(_)));
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_adapter() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let runner = ScriptedRunner::replying("1\n");
        let adapter = adapter(runner).with_cancellation(cancel);

        assert!(adapter.count_commits("demo").await.unwrap_err().is_cancelled());
        assert!(adapter.get_description("demo").await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_list_repositories_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for (name, description) in [("zeta", "Last\n"), ("alpha", "First\n"), ("mid", "")] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
            std::fs::write(dir.path().join(name).join("description"), description).unwrap();
        }
        std::fs::write(dir.path().join("stray-file"), "ignored").unwrap();

        let repositories = storage_adapter(dir.path()).list_repositories().await.unwrap();
        assert_eq!(
            repositories,
            vec![
                RepositoryDescriptor {
                    name: "alpha".to_string(),
                    description: "First\n".to_string()
                },
                RepositoryDescriptor {
                    name: "mid".to_string(),
                    description: String::new()
                },
                RepositoryDescriptor {
                    name: "zeta".to_string(),
                    description: "Last\n".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_repositories_missing_description_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("good")).unwrap();
        std::fs::write(dir.path().join("good").join("description"), "ok").unwrap();
        std::fs::create_dir(dir.path().join("broken")).unwrap();

        let err = storage_adapter(dir.path()).list_repositories().await.unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path.ends_with("broken/description")));
    }

    #[tokio::test]
    async fn test_repository_exists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("present")).unwrap();
        let adapter = storage_adapter(dir.path());

        assert!(adapter.repository_exists("present").await.is_ok());
        assert!(matches!(
            adapter.repository_exists("absent").await,
            Err(Error::Io { .. })
        ));
    }
}
