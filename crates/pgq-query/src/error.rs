//! Error types for query tokenization.

use thiserror::Error;

/// Errors raised while compiling a search query.
///
/// The generator and normalizer never fail on their own; every error originates in the
/// tokenizer and carries the original input so callers can point at the offending byte.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The input could not be partitioned into tokens.
    #[error("malformed query: {message} (at byte {position})")]
    MalformedQuery {
        /// Error message.
        message: String,
        /// The original query string.
        query: String,
        /// Approximate byte position in the query where the error occurred.
        position: usize,
    },
}

impl QueryError {
    /// Creates a malformed-query error.
    pub fn malformed(message: impl Into<String>, position: usize, query: &str) -> Self {
        Self::MalformedQuery {
            message: message.into(),
            query: query.to_string(),
            position,
        }
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        let Self::MalformedQuery { message, .. } = self;
        message
    }

    /// Returns the query string that failed to tokenize.
    pub fn query(&self) -> &str {
        let Self::MalformedQuery { query, .. } = self;
        query
    }

    /// Returns the byte offset of the offending character.
    pub fn position(&self) -> usize {
        let Self::MalformedQuery { position, .. } = self;
        *position
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message();
        if message.contains("proximity") || message.contains("distance") {
            Some("Proximity takes a whole number of words, e.g. 'foo <3> bar' or 'foo AROUND(3) bar'")
        } else {
            None
        }
    }

    /// Formats the error with the query and a caret under the offending position.
    pub fn format_with_context(&self) -> String {
        let query = self.query();
        let clamped = self.position().min(query.len());
        let mut result = format!("query syntax error: {}\n", self.message());
        result.push_str(&format!("  {query}\n"));
        result.push_str(&format!("  {}^", " ".repeat(clamped)));
        if let Some(hint) = self.suggestion() {
            result.push_str(&format!("\nhint: {hint}"));
        }
        result
    }
}
