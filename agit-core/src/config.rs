//! Configuration management for agit
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (AGIT_*)
//! 3. Config file (~/.config/agit/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable naming the repository storage directory
pub const STORAGE_ENV: &str = "AGIT_REPOSITORY_STORAGE";
/// Environment variable naming the git executable
pub const GIT_PATH_ENV: &str = "AGIT_GIT_PATH";
/// Environment variable holding a per-command deadline, e.g. `30s`
pub const GIT_TIMEOUT_ENV: &str = "AGIT_GIT_TIMEOUT";

/// Where repositories live
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one bare repository per subdirectory
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

/// How git is invoked
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitConfig {
    /// Path to the git executable
    pub path: String,

    /// Deadline for a single git invocation; none by default
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            path: "git".to_string(),
            timeout: None,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Repository storage
    pub storage: StorageConfig,
    /// Git invocation
    pub git: GitConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/agit/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("agit").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - AGIT_REPOSITORY_STORAGE: Repository storage directory
    /// - AGIT_GIT_PATH: Path to git executable
    /// - AGIT_GIT_TIMEOUT: Per-command deadline (humantime, e.g. `30s`)
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(root) = lookup(STORAGE_ENV) {
            self.storage.root = PathBuf::from(root);
        }

        if let Some(path) = lookup(GIT_PATH_ENV) {
            self.git.path = path;
        }

        if let Some(timeout) = lookup(GIT_TIMEOUT_ENV) {
            let timeout = humantime_serde::re::humantime::parse_duration(&timeout).map_err(|e| {
                Error::Config(format!("Invalid {} value {:?}: {}", GIT_TIMEOUT_ENV, timeout, e))
            })?;
            self.git.timeout = Some(timeout);
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        storage: Option<PathBuf>,
        git_path: Option<String>,
    ) -> Self {
        if let Some(root) = storage {
            self.storage.root = root;
        }

        if let Some(path) = git_path {
            self.git.path = path;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(storage: Option<PathBuf>, git_path: Option<String>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(storage, git_path))
    }
}
