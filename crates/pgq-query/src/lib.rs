//! Search query compilation for PostgreSQL full-text search.
//!
//! Turns the kind of text people type into a search box into `tsquery` syntax:
//!
//! - **Words**: `rust async` - all must appear (`rust & async`)
//! - **Phrases**: `"error handling"` - adjacent words (`('error' <-> 'handling')`)
//! - **Negation**: `-deprecated` or `!deprecated` - must NOT appear
//! - **OR**: `rust OR golang`, `rust | golang` - alternatives
//! - **AND**: `rust AND async`, `rust & async` - explicit conjunction
//! - **Proximity**: `rust AROUND(3) async`, `rust <3> async` - words within a distance
//! - **Grouping**: `(a b) OR (c d)` - precedence control
//!
//! Compiled queries carry a `pg:` marker so compiling them again is a no-op.
//!
//! # Example
//!
//! ```
//! use pgq_query::normalize;
//!
//! let query = normalize("(rust OR golang) -deprecated").unwrap();
//! assert_eq!(query.as_tsquery(), "(rust | golang) & !deprecated");
//! assert_eq!(normalize(&query.to_marked()).unwrap(), query);
//! ```

#![warn(missing_docs)]

mod canonical;
mod error;
mod generator;
mod lexer;
mod normalize;

pub use canonical::{CanonicalQuery, MARKER};
pub use error::QueryError;
pub use generator::generate;
pub use lexer::{Token, tokenize};
pub use normalize::normalize;
