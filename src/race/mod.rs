//! Race records and their field types.
//!
//! Records are deserialized from the bundled JSON dataset. Every field is
//! optional in the source data, so accessors never assume presence and
//! malformed values degrade instead of failing the whole dataset.

mod date;
mod distance;
pub(crate) mod identity;

pub use date::{RaceDate, cmp_month_day, parse_date};
pub use distance::Distance;
pub use identity::{RaceKey, identify, identify_all};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Canonical identifier from the dataset, either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RaceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{}", id),
            Self::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Trail,
    Road,
    Gravel,
    Track,
    #[serde(other)]
    Other,
}

impl Terrain {
    pub const ALL: [Self; 4] = [Self::Trail, Self::Road, Self::Gravel, Self::Track];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trail => "Trail",
            Self::Road => "Road",
            Self::Gravel => "Gravel",
            Self::Track => "Track",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Fun,
    Competitive,
    #[serde(other)]
    Other,
}

impl Format {
    pub const ALL: [Self; 2] = [Self::Fun, Self::Competitive];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fun => "Fun",
            Self::Competitive => "Competitive",
            Self::Other => "Other",
        }
    }
}

/// A single race listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    #[serde(
        default,
        deserialize_with = "race_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RaceId>,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub nick_name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub location: Option<String>,
    #[serde(default)]
    pub distance: Distance,
    #[serde(default, deserialize_with = "lenient")]
    pub terrain: Option<Terrain>,
    #[serde(default, deserialize_with = "lenient")]
    pub format: Option<Format>,
    #[serde(default, deserialize_with = "date::deserialize_optional")]
    pub date: Option<RaceDate>,
    #[serde(default, deserialize_with = "flag")]
    pub medal: bool,
    #[serde(default, deserialize_with = "flag")]
    pub shirt: bool,
    #[serde(default, deserialize_with = "flag")]
    pub reception: bool,

    // Registration and listing details, carried through untouched
    #[serde(default, deserialize_with = "text")]
    pub registration_start: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub registration_deadline: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub early_bird_deadline: Option<String>,
    #[serde(default)]
    pub cost: Option<Value>,
    #[serde(default)]
    pub early_bird_cost: Option<Value>,
    #[serde(default, deserialize_with = "text")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Race {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn nick_name(&self) -> &str {
        self.nick_name.as_deref().unwrap_or_default()
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or_default()
    }

    /// Name, nickname and location joined for plain substring search.
    pub fn searchable_text(&self) -> String {
        [self.name(), self.nick_name(), self.location()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Deserialize an optional field, mapping values of the wrong shape to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

/// Free-text fields: numbers are kept as their JSON text, other shapes are dropped.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Integral ids stay numeric; fractional or out-of-range numbers become text.
fn race_id<'de, D>(deserializer: D) -> Result<Option<RaceId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => Some(match number.as_i64() {
            Some(id) => RaceId::Number(id),
            None => RaceId::Text(number.to_string()),
        }),
        Some(Value::String(id)) => Some(RaceId::Text(id)),
        _ => None,
    })
}

/// Feature flags: `true` only for a literal JSON `true` (or the string "true").
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}
