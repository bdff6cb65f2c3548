//! Repository-relative paths as segment lists

use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;

/// A slash separated path inside a repository tree
///
/// The empty segment list is the repository root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TreePath(Vec<String>);

impl TreePath {
    /// The repository root
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from already split segments
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Split raw text into segments
    ///
    /// Absolute paths are rejected; git only ever reports paths relative to
    /// the tree being listed. Empty segments (`a//b`, `a/`) are kept so that
    /// encoding restores the text exactly.
    pub fn decode(text: &str) -> Result<Self, ValidationError> {
        if text.is_empty() {
            return Ok(Self::root());
        }

        if text.starts_with('/') {
            return Err(ValidationError::new(text, "Path should never start with `/`"));
        }

        Ok(Self(text.split('/').map(str::to_string).collect()))
    }

    /// Join segments back with `/`
    pub fn encode(&self) -> String {
        self.0.join("/")
    }

    /// The individual segments
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether this is the repository root
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, if any
    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
