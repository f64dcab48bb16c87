//! WHERE predicate builder.

use pgq_query::CanonicalQuery;

use crate::quote::to_tsquery;

/// Builds the boolean match expression for a WHERE clause.
///
/// Matches `vector` when given, otherwise `to_tsvector(document)`:
///
/// ```
/// use pgq_query::normalize;
/// use pgq_sql::build_predicate;
///
/// let query = normalize("foo bar").unwrap();
/// assert_eq!(
///     build_predicate("body", None, &query, Some("english")),
///     "(to_tsvector(body) @@ to_tsquery('pg_catalog.english', 'foo & bar'))"
/// );
/// ```
pub fn build_predicate(
    document: &str,
    vector: Option<&str>,
    query: &CanonicalQuery,
    config: Option<&str>,
) -> String {
    let source = match vector {
        Some(vector) => vector.to_string(),
        None => format!("to_tsvector({document})"),
    };
    format!("({source} @@ {})", to_tsquery(query, config))
}
