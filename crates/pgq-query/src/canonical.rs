//! Compiled query text.

use std::fmt;

/// Prefix that marks a string as already compiled.
///
/// The marker only exists so compiled text can be handed back to [`normalize`](crate::normalize)
/// without being tokenized a second time. It must never be sent to the database.
pub const MARKER: &str = "pg:";

/// A compiled `tsquery` string.
///
/// `Display` writes the marked form (`pg:foo & bar`); [`as_tsquery`](Self::as_tsquery) returns
/// the bare text that belongs in SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CanonicalQuery(String);

impl CanonicalQuery {
    /// Wraps generated `tsquery` text.
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    /// Parses a marked string, returning `None` if the marker is absent.
    pub fn from_marked(input: &str) -> Option<Self> {
        input.strip_prefix(MARKER).map(|text| Self(text.to_string()))
    }

    /// Returns the `tsquery` text without the marker.
    pub fn as_tsquery(&self) -> &str {
        &self.0
    }

    /// Returns the marked form.
    pub fn to_marked(&self) -> String {
        format!("{MARKER}{}", self.0)
    }

    /// Returns true if the query has no terms.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MARKER}{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_round_trip() {
        let query = CanonicalQuery::new("foo & bar".into());
        assert_eq!(query.to_marked(), "pg:foo & bar");
        assert_eq!(query.to_string(), "pg:foo & bar");
        assert_eq!(CanonicalQuery::from_marked(&query.to_marked()), Some(query));
    }

    #[test]
    fn unmarked_is_rejected() {
        assert_eq!(CanonicalQuery::from_marked("foo & bar"), None);
        assert_eq!(CanonicalQuery::from_marked("PG:foo"), None);
    }

    #[test]
    fn empty_marked() {
        let query = CanonicalQuery::from_marked("pg:").unwrap();
        assert!(query.is_empty());
    }
}
