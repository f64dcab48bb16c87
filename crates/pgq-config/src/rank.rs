//! Ranking options.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use tracing::debug;

/// Default `ts_rank` normalization bitmask: divide the rank by the number of unique words.
pub const DEFAULT_NORMALIZATION: u32 = 16;

/// Which PostgreSQL ranking function to call.
///
/// Deserialization is lenient: unknown names fall back to [`RankFunction::Default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RankFunction {
    /// `ts_rank`, based on lexeme frequency.
    #[default]
    Default,
    /// `ts_rank_cd`, cover density ranking.
    CoverDensity,
}

impl RankFunction {
    /// Resolves a function from its configuration name.
    ///
    /// Accepts `default`/`ts_rank` and `cover_density`/`cd`/`ts_rank_cd`, in any case.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "" | "default" | "ts_rank" => Self::Default,
            "cover_density" | "cd" | "ts_rank_cd" => Self::CoverDensity,
            _ => {
                debug!(name, "unknown rank function, falling back to ts_rank");
                Self::Default
            }
        }
    }

    /// Returns the configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::CoverDensity => "cover_density",
        }
    }

    /// Returns the SQL function name.
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::Default => "ts_rank",
            Self::CoverDensity => "ts_rank_cd",
        }
    }
}

impl From<String> for RankFunction {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<RankFunction> for String {
    fn from(function: RankFunction) -> Self {
        function.name().to_string()
    }
}

/// A configuration value that is kept when it has the expected type and dropped otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    /// Value of the expected type.
    Valid(T),
    /// Anything else.
    Invalid(IgnoredAny),
}

impl<T> Lenient<T> {
    /// Returns the value if it had the expected type.
    fn into_option(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }
}

/// Per-label weights for `tsvector` entries.
///
/// Labels left out of a configuration weigh 0. Labels are case-insensitive; when both
/// spellings of a label are given, the lowercase one wins. Unknown labels and non-numeric
/// weights are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RankWeights {
    /// Weight of `A` entries.
    pub a: f32,
    /// Weight of `B` entries.
    pub b: f32,
    /// Weight of `C` entries.
    pub c: f32,
    /// Weight of `D` entries.
    pub d: f32,
}

impl<'de> Deserialize<'de> for RankWeights {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Uppercase keys sort first, so a lowercase duplicate is applied last.
        let raw = BTreeMap::<String, Lenient<f32>>::deserialize(deserializer)?;

        let mut weights = Self::default();
        for (label, value) in raw {
            let slot = match label.as_str() {
                "a" | "A" => &mut weights.a,
                "b" | "B" => &mut weights.b,
                "c" | "C" => &mut weights.c,
                "d" | "D" => &mut weights.d,
                _ => {
                    debug!(label = label.as_str(), "unknown weight label ignored");
                    continue;
                }
            };
            match value.into_option() {
                Some(weight) => *slot = weight,
                None => debug!(label = label.as_str(), "non-numeric weight ignored"),
            }
        }

        Ok(weights)
    }
}

impl RankWeights {
    /// Creates weights for labels A through D.
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// Returns the weights in the `{D, C, B, A}` order `ts_rank` expects, each clamped to
    /// `[0, 1]`.
    pub fn to_array(&self) -> [f32; 4] {
        [self.d, self.c, self.b, self.a].map(clamp_weight)
    }
}

/// Clamps a weight into `[0, 1]`; NaN becomes 0.
fn clamp_weight(weight: f32) -> f32 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0)
    }
}

/// Options for the rank expression.
///
/// Values of the wrong type fall back to the defaults instead of failing the whole file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankOptions {
    /// Ranking function.
    #[serde(deserialize_with = "deserialize_function")]
    pub function: RankFunction,
    /// Label weights. `None` uses the database defaults.
    #[serde(deserialize_with = "deserialize_weights")]
    pub weights: Option<RankWeights>,
    /// Normalization bitmask passed as the last argument.
    #[serde(deserialize_with = "deserialize_normalization")]
    pub normalization: u32,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            function: RankFunction::Default,
            weights: None,
            normalization: DEFAULT_NORMALIZATION,
        }
    }
}

/// Reads a rank function name; anything that is not a string is the default function.
fn deserialize_function<'de, D>(deserializer: D) -> Result<RankFunction, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Lenient::<String>::deserialize(deserializer)?.into_option() {
        Some(name) => RankFunction::from_name(&name),
        None => {
            debug!("rank function is not a name, falling back to ts_rank");
            RankFunction::Default
        }
    })
}

/// Reads label weights; anything that is not a table leaves the database defaults in place.
fn deserialize_weights<'de, D>(deserializer: D) -> Result<Option<RankWeights>, D::Error>
where
    D: Deserializer<'de>,
{
    let weights = Lenient::<RankWeights>::deserialize(deserializer)?.into_option();
    if weights.is_none() {
        debug!("rank weights are not a table, using database defaults");
    }
    Ok(weights)
}

/// Reads the normalization bitmask; values outside `u32` fall back to the default.
fn deserialize_normalization<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Lenient::<i64>::deserialize(deserializer)?.into_option();
    match raw.and_then(|value| u32::try_from(value).ok()) {
        Some(normalization) => Ok(normalization),
        None => {
            debug!(?raw, "invalid rank normalization, using {DEFAULT_NORMALIZATION}");
            Ok(DEFAULT_NORMALIZATION)
        }
    }
}
