//! Tree listing entries (`ls-tree`)

use serde::Serialize;

use super::{Hash, TreePath};
use crate::error::ValidationError;

const TREE_FIELD_COUNT: usize = 4;

/// One entry of a tree listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    /// File mode, e.g. `100644` or `040000`
    pub mode: String,
    /// Object type, e.g. `blob`, `tree` or `commit`
    pub object_type: String,
    /// Abbreviated object id
    pub object: Hash,
    /// Path relative to the repository root
    pub path: TreePath,
}

impl TreeEntry {
    /// Decode a `mode<TAB>type<TAB>object<TAB>path` line
    pub fn decode(line: &str) -> Result<Self, ValidationError> {
        let fields: Vec<&str> = line.splitn(TREE_FIELD_COUNT, '\t').collect();

        let [mode, object_type, object, path] = fields[..] else {
            return Err(ValidationError::new(
                line,
                "Tree entry should contain exactly 4 tab separated fields",
            ));
        };

        Ok(Self {
            mode: mode.to_string(),
            object_type: object_type.to_string(),
            object: Hash::decode(object)?,
            path: TreePath::decode(path)?,
        })
    }

    /// Decode every line, failing on the first malformed one
    pub fn decode_all<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Self>, ValidationError> {
        lines.iter().map(|line| Self::decode(line.as_ref())).collect()
    }

    /// Whether the entry is a directory
    pub fn is_tree(&self) -> bool {
        self.object_type == "tree"
    }
}
