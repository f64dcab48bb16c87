//! One-call compilation of a search string into every SQL fragment.

use pgq_config::SearchOptions;
use pgq_query::{CanonicalQuery, QueryError, normalize};
use tracing::debug;

use crate::{headline::build_headline, order::compile_order, predicate::build_predicate};

/// SQL fragments for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSearch {
    /// The compiled query. Pass `query.to_marked()` back in to skip recompilation.
    pub query: CanonicalQuery,
    /// Boolean WHERE predicate.
    pub predicate: String,
    /// Rank expression, present when the ordering uses `rank`.
    pub rank: Option<String>,
    /// `ts_headline(...) AS attr` select-list entry, present when headline options are set.
    pub headline: Option<String>,
    /// ORDER BY clauses. Empty when no ordering was requested.
    pub order: Vec<String>,
}

/// Compiles a search string and builds every fragment the options ask for.
///
/// The string is normalized once; already compiled (`pg:`-marked) input is not re-tokenized.
pub fn compile(input: &str, opts: &SearchOptions) -> Result<CompiledSearch, QueryError> {
    let query = normalize(input)?;
    let config = opts.config.as_deref();

    let predicate = build_predicate(&opts.document, opts.vector.as_deref(), &query, config);
    let order = compile_order(
        &opts.order,
        &opts.rank,
        &opts.vector_source(),
        &query,
        config,
    );
    let headline = opts.headline.as_ref().map(|headline| {
        build_headline(
            &opts.document,
            &query,
            Some(&headline.attr),
            config,
            &headline.options,
        )
    });

    debug!(
        query = query.as_tsquery(),
        order_clauses = order.clauses.len(),
        headline = headline.is_some(),
        "built search fragments"
    );

    Ok(CompiledSearch {
        query,
        predicate,
        rank: order.rank,
        headline,
        order: order.clauses,
    })
}
