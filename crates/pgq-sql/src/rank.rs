//! Rank expression builder.

use pgq_config::RankOptions;
use pgq_query::CanonicalQuery;

use crate::quote::to_tsquery;

/// Builds a scalar rank expression.
///
/// Produces `ts_rank([weights, ]vector, query, normalization)` or the `ts_rank_cd` equivalent.
/// Weights are written as a `'{D, C, B, A}'` array only when set.
///
/// A query made only of negated terms (`-foo`) ranks every row 0: the ranking functions score
/// matched lexemes, and a negation matches by absence. Callers that need an ordering for such
/// queries should add a secondary ORDER BY clause.
pub fn build_rank(
    vector: &str,
    query: &CanonicalQuery,
    opts: &RankOptions,
    config: Option<&str>,
) -> String {
    let mut args = Vec::with_capacity(4);

    if let Some(weights) = &opts.weights {
        let [d, c, b, a] = weights.to_array();
        args.push(format!("'{{{d}, {c}, {b}, {a}}}'"));
    }
    args.push(vector.to_string());
    args.push(to_tsquery(query, config));
    args.push(opts.normalization.to_string());

    format!("{}({})", opts.function.sql_name(), args.join(", "))
}
