//! Patch text from `show --format=%N`

use serde::Serialize;

use crate::error::ValidationError;

/// Patch text with git's structural padding stripped
///
/// Diffs are terminal values: decoding an already stripped diff fails
/// because the padding lines are gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diff(String);

impl Diff {
    /// Strip the two leading blank lines and the trailing newline
    pub fn decode(text: &str) -> Result<Self, ValidationError> {
        let lines: Vec<&str> = text.split('\n').collect();

        let padded = lines.len() >= 2
            && lines[0].is_empty()
            && lines[1].is_empty()
            && lines[lines.len() - 1].is_empty();

        if !padded {
            return Err(ValidationError::new(
                text,
                "Raw diff should contain 2 padding lines at the beginning and 1 padding line at the end",
            ));
        }

        let interior = lines.get(2..lines.len() - 1).unwrap_or_default();
        Ok(Self(interior.join("\n")))
    }

    /// The patch text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the patch text
    pub fn into_inner(self) -> String {
        self.0
    }
}
