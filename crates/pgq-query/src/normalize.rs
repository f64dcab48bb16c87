//! Idempotent query compilation.

use tracing::debug;

use crate::{
    canonical::CanonicalQuery, error::QueryError, generator::generate, lexer::tokenize,
};

/// Compiles raw search text into a [`CanonicalQuery`].
///
/// Input that already carries the [`MARKER`](crate::MARKER) is passed through without being
/// tokenized, so feeding compiled output back in is a no-op.
pub fn normalize(input: &str) -> Result<CanonicalQuery, QueryError> {
    if let Some(query) = CanonicalQuery::from_marked(input) {
        debug!(query = query.as_tsquery(), "query already compiled");
        return Ok(query);
    }

    let tokens = tokenize(input)?;
    let query = generate(&tokens);
    debug!(
        input,
        tokens = tokens.len(),
        query = query.as_tsquery(),
        "compiled search query"
    );
    Ok(query)
}
