//! Stable identity for race records that may lack a canonical key.

use super::{Race, RaceId};
use std::fmt;

/// Resolved identity of a race within one collection.
///
/// `Position` keys are only meaningful inside the slice they were resolved
/// against; never compare them across different collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RaceKey {
    Explicit(RaceId),
    NameDate(String),
    Position(usize),
}

impl RaceKey {
    /// Whether the key survives filtering and reordering of the collection.
    pub fn is_stable(&self) -> bool {
        !matches!(self, Self::Position(_))
    }
}

impl fmt::Display for RaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(id) => write!(f, "{}", id),
            Self::NameDate(composite) => f.write_str(composite),
            Self::Position(index) => write!(f, "idx-{}", index),
        }
    }
}

/// Resolve the identity of `race`, using `fallback_index` (its position in the
/// slice being processed) when neither an id nor a name and date are present.
pub fn identify(race: &Race, fallback_index: usize) -> RaceKey {
    if let Some(id) = &race.id {
        return RaceKey::Explicit(id.clone());
    }

    let name = race.name.as_deref().map(str::trim).unwrap_or_default();
    let date = race.date.as_ref().map(|d| d.raw().trim()).unwrap_or_default();
    if !name.is_empty() && !date.is_empty() {
        return RaceKey::NameDate(format!("{}-{}", name, date));
    }

    RaceKey::Position(fallback_index)
}

/// Resolve every race of a collection against its own positions.
pub fn identify_all<'a>(races: impl IntoIterator<Item = &'a Race>) -> Vec<RaceKey> {
    races
        .into_iter()
        .enumerate()
        .map(|(index, race)| identify(race, index))
        .collect()
}
