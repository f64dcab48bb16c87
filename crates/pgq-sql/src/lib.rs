//! SQL fragments for PostgreSQL full-text search.
//!
//! Embeds a compiled search query into a relational query:
//!
//! - [`build_predicate`]: `(vector @@ to_tsquery(...))` for WHERE
//! - [`build_rank`]: `ts_rank(...)` / `ts_rank_cd(...)` for SELECT or ORDER BY
//! - [`build_headline`]: `ts_headline(...) AS headline` for SELECT
//! - [`compile_order`]: ORDER BY clauses with `rank` replaced by the rank expression
//!
//! [`compile`] runs them all from a [`SearchOptions`](pgq_config::SearchOptions).
//!
//! # Example
//!
//! ```
//! use pgq_config::{OrderSpec, SearchOptions};
//! use pgq_sql::compile;
//!
//! let opts = SearchOptions {
//!     config: Some("english".into()),
//!     document: "body".into(),
//!     order: OrderSpec::from("rank DESC, title ASC"),
//!     ..SearchOptions::default()
//! };
//! let search = compile("rust -deprecated", &opts).unwrap();
//! assert_eq!(
//!     search.predicate,
//!     "(to_tsvector(body) @@ to_tsquery('pg_catalog.english', 'rust & !deprecated'))"
//! );
//! assert_eq!(search.order[1], "title ASC");
//! ```

#![warn(missing_docs)]

mod compile;
mod headline;
mod order;
mod predicate;
mod quote;
mod rank;

pub use compile::{CompiledSearch, compile};
pub use headline::build_headline;
pub use order::{DEFAULT_RANK_DIRECTION, OrderClauses, compile_order};
pub use predicate::build_predicate;
pub use quote::{CONFIG_SCHEMA, config_literal, identifier, literal, to_tsquery};
pub use rank::build_rank;
