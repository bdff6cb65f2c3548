//! Abbreviated object hashes

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;

/// Length every abbreviated hash is requested and validated at
pub const HASH_LENGTH: usize = 12;

/// A 12 character lowercase hex object id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Hash(String);

impl Hash {
    /// Validate raw text as an abbreviated hash
    pub fn decode(text: &str) -> Result<Self, ValidationError> {
        let valid = text.len() == HASH_LENGTH
            && text
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        if !valid {
            return Err(ValidationError::new(text, "Hash should contain only hex char"));
        }

        Ok(Self(text.to_string()))
    }

    /// The textual form, identical to the decoded input
    pub fn encode(&self) -> &str {
        &self.0
    }

    /// Borrow as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Hash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl AsRef<str> for Hash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
