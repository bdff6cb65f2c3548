//! Typed records decoded from git's line oriented output
//!
//! Every decoder here is a pure function from raw text (or a slice of lines)
//! to a typed value or a [`ValidationError`](crate::ValidationError).
//! Collection decoders fail on the first malformed element.

mod commit;
mod decoration;
mod diff;
mod hash;
mod path;
mod tree;

pub use commit::{chunk, CommitDetail, CommitSummary, DETAIL_HEADER_LINE_COUNT, SUMMARY_LINE_COUNT};
pub use decoration::{Decoration, DecorationKind};
pub use diff::Diff;
pub use hash::{Hash, HASH_LENGTH};
pub use path::TreePath;
pub use tree::TreeEntry;
