//! Commit summaries (`log`) and commit details (`show -s`)

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Decoration, Hash};
use crate::error::ValidationError;

/// Lines emitted per commit by the summary format `%h%n%at%n%an%n%s%n%D`
pub const SUMMARY_LINE_COUNT: usize = 5;

/// Fixed header lines emitted by the detail format before the body
pub const DETAIL_HEADER_LINE_COUNT: usize = 10;

/// A commit as shown in a history listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    /// Abbreviated commit id
    pub hash: Hash,
    /// Author date
    pub date: DateTime<Utc>,
    /// Author name
    pub author: String,
    /// First line of the message
    pub subject: String,
    /// Refs pointing at this commit
    pub decorations: Vec<Decoration>,
}

/// Full metadata for a single commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitDetail {
    pub hash: Hash,
    pub author: String,
    pub author_email: String,
    pub author_date: DateTime<Utc>,
    pub committer: String,
    pub committer_email: String,
    pub committer_date: DateTime<Utc>,
    /// Signer identity, when the commit is signed
    pub signer: Option<String>,
    /// Signing key, when the commit is signed
    pub signature_key: Option<String>,
    pub subject: String,
    /// Message body after the subject, possibly empty
    pub body: String,
}

/// Split a flat line stream into consecutive groups of [`SUMMARY_LINE_COUNT`]
///
/// A trailing group may be shorter when the input length is not a multiple
/// of the group size; [`CommitSummary::decode`] rejects it.
pub fn chunk<S>(lines: &[S]) -> Vec<&[S]> {
    lines.chunks(SUMMARY_LINE_COUNT).collect()
}

fn decode_timestamp(text: &str) -> Result<DateTime<Utc>, ValidationError> {
    text.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| ValidationError::new(text, "Date should be a unix timestamp in seconds"))
}

fn decode_optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CommitSummary {
    /// Decode one group of summary lines
    pub fn decode<S: AsRef<str>>(group: &[S]) -> Result<Self, ValidationError> {
        let [hash, date, author, subject, decorations] = group else {
            return Err(ValidationError::new(
                join(group),
                "Raw commit text should contain exactly 5 lines",
            ));
        };

        Ok(Self {
            hash: Hash::decode(hash.as_ref())?,
            date: decode_timestamp(date.as_ref())?,
            author: author.as_ref().to_string(),
            subject: subject.as_ref().to_string(),
            decorations: Decoration::parse_list(decorations.as_ref()),
        })
    }

    /// Decode a full `log` output, failing on the first malformed group
    pub fn decode_all<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Self>, ValidationError> {
        chunk(lines).into_iter().map(Self::decode).collect()
    }
}

impl CommitDetail {
    /// Decode the detail header lines followed by the body
    pub fn decode<S: AsRef<str>>(lines: &[S]) -> Result<Self, ValidationError> {
        if lines.len() < DETAIL_HEADER_LINE_COUNT {
            return Err(ValidationError::new(
                join(lines),
                format!(
                    "Raw commit detail should contain at least {} lines",
                    DETAIL_HEADER_LINE_COUNT
                ),
            ));
        }

        let field = |index: usize| lines[index].as_ref();
        let body: Vec<&str> = lines[DETAIL_HEADER_LINE_COUNT..]
            .iter()
            .map(|l| l.as_ref())
            .collect();

        Ok(Self {
            hash: Hash::decode(field(0))?,
            author: field(1).to_string(),
            author_email: field(2).to_string(),
            author_date: decode_timestamp(field(3))?,
            committer: field(4).to_string(),
            committer_email: field(5).to_string(),
            committer_date: decode_timestamp(field(6))?,
            signer: decode_optional(field(7)),
            signature_key: decode_optional(field(8)),
            subject: field(9).to_string(),
            body: body.join("\n"),
        })
    }

    /// Whether git reported a signature for this commit
    pub fn is_signed(&self) -> bool {
        self.signer.is_some() || self.signature_key.is_some()
    }
}

fn join<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(|l| l.as_ref()).collect::<Vec<&str>>().join("\n")
}
