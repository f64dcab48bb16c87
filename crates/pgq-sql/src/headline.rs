//! Headline (highlighted excerpt) builder.

use std::collections::BTreeMap;

use pgq_config::DEFAULT_HEADLINE_ATTR;
use pgq_query::CanonicalQuery;

use crate::quote::{config_literal, identifier, literal, to_tsquery};

/// Builds a `ts_headline(...) AS attr` select-list entry.
///
/// `options` are written as a single `'Key = value, ...'` string in key order; the argument is
/// left out when there are none. `attr` defaults to `headline`.
pub fn build_headline(
    document: &str,
    query: &CanonicalQuery,
    attr: Option<&str>,
    config: Option<&str>,
    options: &BTreeMap<String, String>,
) -> String {
    let mut args = Vec::with_capacity(4);
    if let Some(config) = config {
        args.push(config_literal(config));
    }
    args.push(document.to_string());
    args.push(to_tsquery(query, config));
    if !options.is_empty() {
        args.push(literal(&headline_options(options)));
    }

    let attr = attr.unwrap_or(DEFAULT_HEADLINE_ATTR);
    format!("ts_headline({}) AS {}", args.join(", "), identifier(attr))
}

/// Serializes headline options as `Key = value` pairs.
fn headline_options(options: &BTreeMap<String, String>) -> String {
    options
        .iter()
        .map(|(key, value)| format!("{} = {}", option_word(key), option_word(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Double-quotes an option key or value that the `ts_headline` option parser would otherwise
/// split.
fn option_word(word: &str) -> String {
    let needs_quotes = word.is_empty()
        || word
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '=' | '"'));

    if needs_quotes {
        format!("\"{}\"", word.replace('"', "\"\""))
    } else {
        word.to_string()
    }
}
