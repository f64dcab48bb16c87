//! ORDER BY compiler.
//!
//! Directives pass through as written, except those that start with the word `rank`, which are
//! replaced by a rank expression:
//!
//! ```text
//! "rank DESC, title ASC"  →  ["ts_rank(tsv, to_tsquery('foo'), 16) DESC", "title ASC"]
//! "rank"                  →  ["ts_rank(tsv, to_tsquery('foo'), 16) DESC"]
//! ```

use pgq_config::{OrderSpec, RankOptions};
use pgq_query::CanonicalQuery;

use crate::rank::build_rank;

/// Direction used when a `rank` directive does not name one.
pub const DEFAULT_RANK_DIRECTION: &str = "DESC";

/// Compiled ORDER BY clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderClauses {
    /// ORDER BY entries, in order.
    pub clauses: Vec<String>,
    /// The rank expression, if any directive ordered by rank. Useful for selecting the score.
    pub rank: Option<String>,
}

/// Compiles an order spec into ORDER BY clauses.
///
/// A disabled or empty spec yields no clauses; the caller supplies its own default.
pub fn compile_order(
    spec: &OrderSpec,
    rank: &RankOptions,
    vector: &str,
    query: &CanonicalQuery,
    config: Option<&str>,
) -> OrderClauses {
    if spec.is_disabled() {
        return OrderClauses::default();
    }

    let directives: Vec<&str> = match spec {
        OrderSpec::Disabled => Vec::new(),
        OrderSpec::Text(text) => split_directives(text),
        OrderSpec::List(items) => items.iter().map(|item| item.trim()).collect(),
    };

    let mut compiled = OrderClauses::default();
    for directive in directives.into_iter().filter(|d| !d.is_empty()) {
        let Some(direction) = rank_direction(directive) else {
            compiled.clauses.push(directive.to_string());
            continue;
        };

        let expr = compiled
            .rank
            .get_or_insert_with(|| build_rank(vector, query, rank, config));
        let direction = if direction.is_empty() {
            DEFAULT_RANK_DIRECTION
        } else {
            direction
        };
        compiled.clauses.push(format!("{expr} {direction}"));
    }

    compiled
}

/// If `directive` orders by rank, returns the text after the `rank` keyword.
fn rank_direction(directive: &str) -> Option<&str> {
    let keyword_end = directive
        .find(char::is_whitespace)
        .unwrap_or(directive.len());
    let (keyword, rest) = directive.split_at(keyword_end);
    keyword.eq_ignore_ascii_case("rank").then_some(rest.trim())
}

/// Splits comma-delimited directives, ignoring commas inside parentheses or quotes.
fn split_directives(text: &str) -> Vec<&str> {
    let mut directives = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in text.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                directives.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    directives.push(text[start..].trim());

    directives
}

#[cfg(test)]
mod tests {
    use pgq_query::normalize;

    use super::*;

    const RANK: &str = "ts_rank(tsv, to_tsquery('foo'), 16)";

    fn compile(spec: OrderSpec) -> OrderClauses {
        let query = normalize("foo").unwrap();
        compile_order(&spec, &RankOptions::default(), "tsv", &query, None)
    }

    #[test]
    fn disabled() {
        for spec in [
            OrderSpec::Disabled,
            OrderSpec::from(""),
            OrderSpec::from(" , "),
            OrderSpec::List(vec!["  ".into()]),
        ] {
            assert_eq!(compile(spec), OrderClauses::default());
        }
    }

    #[test]
    fn rank_with_direction_and_passthrough() {
        let order = compile(OrderSpec::from("rank DESC, title ASC"));
        assert_eq!(order.clauses, vec![format!("{RANK} DESC"), "title ASC".into()]);
        assert_eq!(order.rank.as_deref(), Some(RANK));
    }

    #[test]
    fn rank_default_direction() {
        let order = compile(OrderSpec::from("RANK"));
        assert_eq!(order.clauses, vec![format!("{RANK} DESC")]);
    }

    #[test]
    fn rank_keeps_own_direction_text() {
        let order = compile(OrderSpec::List(vec!["Rank asc nulls last".into()]));
        assert_eq!(order.clauses, vec![format!("{RANK} asc nulls last")]);
    }

    #[test]
    fn rank_prefix_words_pass_through() {
        let order = compile(OrderSpec::from("ranking DESC, rank_score"));
        assert_eq!(order.clauses, vec!["ranking DESC", "rank_score"]);
        assert_eq!(order.rank, None);
    }

    #[test]
    fn list_spec() {
        let order = compile(OrderSpec::List(vec![
            " title ".into(),
            "rank".into(),
            "".into(),
        ]));
        assert_eq!(order.clauses, vec!["title".to_string(), format!("{RANK} DESC")]);
    }

    #[test]
    fn commas_inside_expressions() {
        assert_eq!(
            split_directives("coalesce(a, b) DESC, 'x,y', c"),
            vec!["coalesce(a, b) DESC", "'x,y'", "c"]
        );
    }

    #[test]
    fn rank_uses_options() {
        let query = normalize("a b").unwrap();
        let opts = RankOptions {
            normalization: 1,
            ..RankOptions::default()
        };
        let order = compile_order(
            &OrderSpec::from("rank"),
            &opts,
            "to_tsvector(body)",
            &query,
            Some("english"),
        );
        assert_eq!(
            order.clauses,
            vec![
                "ts_rank(to_tsvector(body), to_tsquery('pg_catalog.english', 'a & b'), 1) DESC"
                    .to_string()
            ]
        );
    }
}
