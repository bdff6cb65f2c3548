//! Ref decorations attached to commits (`%D`)

use serde::Serialize;

const HEAD_PREFIX: &str = "HEAD -> ";
const TAG_PREFIXES: [&str; 2] = ["Tag: ", "tag: "];

/// What a decoration label refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationKind {
    /// The current HEAD
    Head,
    /// A branch tip, local or remote
    Branch,
    /// A tag
    Tag,
}

/// A single labeled ref
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoration {
    /// Ref name as printed by git
    pub label: String,
    /// Kind of ref
    pub kind: DecorationKind,
}

impl Decoration {
    /// Create a decoration
    pub fn new(label: impl Into<String>, kind: DecorationKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// Parse a raw decoration string such as `HEAD -> main, tag: v1, origin/main`
    ///
    /// Never fails: anything unrecognised is a branch name.
    pub fn parse_list(text: &str) -> Vec<Decoration> {
        let mut decorations = Vec::new();

        for token in text.split(", ") {
            if token.is_empty() {
                continue;
            }

            if let Some(branch) = token.strip_prefix(HEAD_PREFIX) {
                decorations.push(Decoration::new("HEAD", DecorationKind::Head));
                decorations.push(Decoration::new(branch, DecorationKind::Branch));
                continue;
            }

            if let Some(tag) = TAG_PREFIXES.iter().find_map(|p| token.strip_prefix(*p)) {
                decorations.push(Decoration::new(tag, DecorationKind::Tag));
                continue;
            }

            decorations.push(Decoration::new(token, DecorationKind::Branch));
        }

        decorations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed() {
        let parsed = Decoration::parse_list("HEAD -> main, Tag: v1, dev");
        assert_eq!(
            parsed,
            vec![
                Decoration::new("HEAD", DecorationKind::Head),
                Decoration::new("main", DecorationKind::Branch),
                Decoration::new("v1", DecorationKind::Tag),
                Decoration::new("dev", DecorationKind::Branch),
            ]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(Decoration::parse_list("").is_empty());
    }

    #[test]
    fn test_lowercase_tag_prefix() {
        let parsed = Decoration::parse_list("tag: v0.1.0, origin/main");
        assert_eq!(
            parsed,
            vec![
                Decoration::new("v0.1.0", DecorationKind::Tag),
                Decoration::new("origin/main", DecorationKind::Branch),
            ]
        );
    }

    #[test]
    fn test_detached_head_is_branch_label() {
        // Detached HEAD prints a bare `HEAD` without an arrow
        let parsed = Decoration::parse_list("HEAD");
        assert_eq!(parsed, vec![Decoration::new("HEAD", DecorationKind::Branch)]);
    }
}
