//! Read-only filesystem access used by the repository adapter

use std::path::Path;

use async_trait::async_trait;

use crate::{Error, Result};

/// Filesystem reads the adapter needs
///
/// Kept behind a trait so the adapter can be driven without touching disk.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Names of the subdirectories of `path`, in no particular order
    async fn list_directories(&self, path: &Path) -> Result<Vec<String>>;

    /// Whole file contents as text
    async fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Succeeds if `path` exists and its metadata is readable
    async fn access(&self, path: &Path) -> Result<()>;
}

/// [`FileSystem`] backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveFileSystem;

#[async_trait]
impl FileSystem for LiveFileSystem {
    async fn list_directories(&self, path: &Path) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|e| Error::io(path, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| Error::io(path, e))? {
            let entry_path = entry.path();
            // Follows symlinks so linked repositories are listed too
            let is_dir = match tokio::fs::metadata(&entry_path).await {
                Ok(metadata) => metadata.is_dir(),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(path = %entry_path.display(), "Skipping dangling entry");
                    false
                }
                Err(e) => return Err(Error::io(entry_path, e)),
            };
            if !is_dir {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => {
                    tracing::warn!(?name, "Skipping repository with non UTF-8 name");
                }
            }
        }

        Ok(names)
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(path, e))
    }

    async fn access(&self, path: &Path) -> Result<()> {
        tokio::fs::metadata(path)
            .await
            .map(|_| ())
            .map_err(|e| Error::io(path, e))
    }
}
