//! SQL quoting helpers.
//!
//! Everything a user or a config file can influence passes through here before it lands in
//! SQL text. Literals assume `standard_conforming_strings`, the PostgreSQL default, so only
//! single quotes need escaping.

use pgq_query::CanonicalQuery;

/// Schema holding the built-in text search configurations.
pub const CONFIG_SCHEMA: &str = "pg_catalog";

/// Quotes a string as a SQL literal.
pub fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quotes an identifier if it is not a plain lowercase SQL name.
pub fn identifier(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Returns a text search configuration name as a literal, schema-qualified.
///
/// Names without a schema are taken from `pg_catalog`.
pub fn config_literal(config: &str) -> String {
    if config.contains('.') {
        literal(config)
    } else {
        literal(&format!("{CONFIG_SCHEMA}.{config}"))
    }
}

/// Returns the `to_tsquery` call for a compiled query.
pub fn to_tsquery(query: &CanonicalQuery, config: Option<&str>) -> String {
    let text = literal(query.as_tsquery());
    match config {
        Some(config) => format!("to_tsquery({}, {text})", config_literal(config)),
        None => format!("to_tsquery({text})"),
    }
}

#[cfg(test)]
mod tests {
    use pgq_query::normalize;

    use super::*;

    #[test]
    fn literal_escapes_quotes() {
        assert_eq!(literal("foo"), "'foo'");
        assert_eq!(literal("it's"), "'it''s'");
        assert_eq!(literal("'); DROP TABLE x; --"), "'''); DROP TABLE x; --'");
    }

    #[test]
    fn identifiers() {
        assert_eq!(identifier("headline"), "headline");
        assert_eq!(identifier("_h1"), "_h1");
        assert_eq!(identifier("Headline"), "\"Headline\"");
        assert_eq!(identifier("my excerpt"), "\"my excerpt\"");
        assert_eq!(identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(identifier("1st"), "\"1st\"");
        assert_eq!(identifier(""), "\"\"");
    }

    #[test]
    fn config_schema_prefix() {
        assert_eq!(config_literal("english"), "'pg_catalog.english'");
        assert_eq!(config_literal("public.custom"), "'public.custom'");
    }

    #[test]
    fn tsquery_call() {
        let query = normalize("foo bar").unwrap();
        assert_eq!(to_tsquery(&query, None), "to_tsquery('foo & bar')");
        assert_eq!(
            to_tsquery(&query, Some("english")),
            "to_tsquery('pg_catalog.english', 'foo & bar')"
        );
    }

    #[test]
    fn tsquery_escapes_lexemes() {
        let query = normalize("it's").unwrap();
        assert_eq!(to_tsquery(&query, None), "to_tsquery('''it''''s''')");
    }
}
