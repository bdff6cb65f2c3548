//! Repository name to storage path mapping

use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::{Error, Result};

/// File inside each repository holding its free-text description
pub const DESCRIPTION_FILE: &str = "description";

/// Maps repository names onto directories under the storage root
#[derive(Debug, Clone)]
pub struct RepositoryPathResolver {
    root: PathBuf,
}

impl RepositoryPathResolver {
    /// Create a resolver for the given storage root
    ///
    /// Relative roots are resolved against the current directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = std::path::absolute(root).map_err(|e| Error::io(root, e))?;
        Ok(Self { root })
    }

    /// Create a resolver from the storage section of the configuration
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        Self::new(&config.root)
    }

    /// The absolute storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the named repository
    ///
    /// Names must be a single path component; anything that could escape the
    /// storage root is rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);

        if invalid {
            return Err(Error::InvalidRepositoryName(name.to_string()));
        }

        Ok(self.root.join(name))
    }

    /// Absolute path of the named repository's description file
    pub fn description_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.resolve(name)?.join(DESCRIPTION_FILE))
    }
}
