//! ORDER BY options.

use serde::{Deserialize, Serialize};

/// Requested result ordering.
///
/// In TOML this is `false`, a comma-delimited string, or an array of directives. A directive
/// whose first word is `rank` orders by relevance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOrder", into = "RawOrder")]
pub enum OrderSpec {
    /// No ordering; the caller supplies its own default.
    #[default]
    Disabled,
    /// Comma-delimited directives, e.g. `"rank DESC, title ASC"`.
    Text(String),
    /// One directive per entry.
    List(Vec<String>),
}

impl OrderSpec {
    /// Returns true if no ordering was requested.
    pub fn is_disabled(&self) -> bool {
        match self {
            Self::Disabled => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }
}

impl From<&str> for OrderSpec {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<String>> for OrderSpec {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<bool> for OrderSpec {
    /// `false` disables ordering. `true` carries no directives, so it does too.
    fn from(_: bool) -> Self {
        Self::Disabled
    }
}

/// Serialized shape of [`OrderSpec`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
enum RawOrder {
    /// `false`.
    Flag(bool),
    /// A comma-delimited string.
    Text(String),
    /// An array of directives.
    List(Vec<String>),
}

impl From<RawOrder> for OrderSpec {
    fn from(raw: RawOrder) -> Self {
        match raw {
            RawOrder::Flag(flag) => Self::from(flag),
            RawOrder::Text(text) => Self::Text(text),
            RawOrder::List(items) => Self::List(items),
        }
    }
}

impl From<OrderSpec> for RawOrder {
    fn from(spec: OrderSpec) -> Self {
        match spec {
            OrderSpec::Disabled => Self::Flag(false),
            OrderSpec::Text(text) => Self::Text(text),
            OrderSpec::List(items) => Self::List(items),
        }
    }
}
