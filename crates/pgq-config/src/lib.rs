//! Search options for pgq.
//!
//! Options can be built in code or loaded from a TOML file:
//!
//! ```toml
//! config = "english"
//! document = "body"
//! vector = "search_vector"
//! order = "rank DESC, title ASC"
//!
//! [rank]
//! function = "cover_density"
//! normalization = 32
//! weights = { A = 1.0, B = 0.4 }
//!
//! [headline]
//! attr = "excerpt"
//! options = { MaxWords = 20, MinWords = 5 }
//! ```
//!
//! Every field is optional. Unrecognized values fall back to defaults rather than failing.

#![warn(missing_docs)]

mod error;
mod order;
mod rank;

use std::{collections::BTreeMap, fmt, fs, path::Path};

pub use error::ConfigError;
pub use order::OrderSpec;
pub use rank::{DEFAULT_NORMALIZATION, RankFunction, RankOptions, RankWeights};
use serde::{Deserialize, Deserializer, Serialize};

/// Default alias for the headline column.
pub const DEFAULT_HEADLINE_ATTR: &str = "headline";

/// Default SQL expression for the searched document.
pub const DEFAULT_DOCUMENT: &str = "document";

/// Everything needed to turn a search string into SQL fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Text search configuration (e.g. `english`). `None` uses the database default.
    pub config: Option<String>,
    /// SQL expression for the document text.
    pub document: String,
    /// SQL expression for a precomputed `tsvector`. When absent, the document is converted
    /// with `to_tsvector`.
    pub vector: Option<String>,
    /// Rank expression options.
    pub rank: RankOptions,
    /// Requested ordering.
    pub order: OrderSpec,
    /// Headline options. `None` skips the headline.
    pub headline: Option<HeadlineOptions>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            config: None,
            document: String::from(DEFAULT_DOCUMENT),
            vector: None,
            rank: RankOptions::default(),
            order: OrderSpec::Disabled,
            headline: None,
        }
    }
}

impl SearchOptions {
    /// Loads options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&contents, path)
    }

    /// Parses options from a TOML string.
    ///
    /// The `path` parameter is used for error reporting.
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the SQL expression to match against: the vector if set, else the document.
    pub fn vector_source(&self) -> String {
        match &self.vector {
            Some(vector) => vector.clone(),
            None => format!("to_tsvector({})", self.document),
        }
    }
}

/// Options for the `ts_headline` excerpt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlineOptions {
    /// Column alias for the excerpt.
    pub attr: String,
    /// `ts_headline` options such as `MaxWords` or `StartSel`.
    #[serde(deserialize_with = "deserialize_scalar_map")]
    pub options: BTreeMap<String, String>,
}

impl Default for HeadlineOptions {
    fn default() -> Self {
        Self {
            attr: String::from(DEFAULT_HEADLINE_ATTR),
            options: BTreeMap::new(),
        }
    }
}

/// A TOML scalar accepted as a headline option value.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Deserializes a map whose values may be any scalar, stringifying them.
fn deserialize_scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Scalar>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key, value.to_string()))
        .collect())
}
