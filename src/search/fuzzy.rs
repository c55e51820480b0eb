//! Typo-tolerant text matching over race name, nickname and location.

use super::normalize::fold;
use super::scoring::field_score;
use crate::race::{Race, RaceKey, identify};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Ranks a candidate collection against a free-text term.
///
/// Implementations return positions into `candidates`, best match first, and
/// may cap the number of results.
pub trait TextIndex: Send + Sync {
    fn rank(&self, candidates: &[&Race], term: &str) -> Vec<usize>;
}

/// Searchable race fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    NickName,
    Location,
}

impl Field {
    fn read(self, race: &Race) -> &str {
        match self {
            Self::Name => race.name(),
            Self::NickName => race.nick_name(),
            Self::Location => race.location(),
        }
    }
}

/// Weighting and tolerance for [`FuzzyIndex`].
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzySettings {
    /// Searched fields with their relative weights.
    pub keys: Vec<(Field, f64)>,
    /// Minimum Jaro-Winkler similarity for a typo-tolerant match.
    pub threshold: f64,
    /// Maximum number of ranked results.
    pub limit: usize,
}

impl Default for FuzzySettings {
    fn default() -> Self {
        Self {
            keys: vec![
                (Field::Name, 1.0),
                (Field::NickName, 0.75),
                (Field::Location, 0.5),
            ],
            threshold: 0.82,
            limit: 50,
        }
    }
}

/// Pre-folded searchable fields of one race, in `keys` order.
#[derive(Debug, Clone)]
struct FoldedFields {
    raw: Vec<String>,
    folded: Vec<String>,
}

impl FoldedFields {
    /// Whether these fields were folded from `race`'s current text.
    fn folded_from(&self, race: &Race, keys: &[(Field, f64)]) -> bool {
        self.raw.len() == keys.len()
            && keys
                .iter()
                .zip(&self.raw)
                .all(|((field, _), raw)| field.read(race) == raw.as_str())
    }
}

/// Weighted fuzzy matcher over a race snapshot.
///
/// Building the index folds the searchable fields of every race that has a
/// stable identity; other races are folded when ranked. A cached entry is only
/// used for a candidate whose text it was folded from, so records sharing an
/// identity never borrow each other's fields.
#[derive(Debug, Clone)]
pub struct FuzzyIndex {
    settings: FuzzySettings,
    max_weight: f64,
    folded: AHashMap<RaceKey, FoldedFields>,
}

impl FuzzyIndex {
    pub fn new(settings: FuzzySettings) -> Self {
        let max_weight = settings
            .keys
            .iter()
            .map(|(_, weight)| *weight)
            .fold(0.0, f64::max);

        Self {
            settings,
            max_weight,
            folded: AHashMap::new(),
        }
    }

    /// Build an index with the fields of `snapshot` folded up front.
    pub fn build(settings: FuzzySettings, snapshot: &[Race]) -> Self {
        let start = std::time::Instant::now();
        let mut index = Self::new(settings);

        for (position, race) in snapshot.iter().enumerate() {
            let key = identify(race, position);
            if key.is_stable() {
                let fields = index.fold_fields(race);
                index.folded.insert(key, fields);
            }
        }

        tracing::info!(
            "Built fuzzy index: {} of {} races pre-folded in {:?}",
            index.folded.len(),
            snapshot.len(),
            start.elapsed()
        );

        index
    }

    pub fn settings(&self) -> &FuzzySettings {
        &self.settings
    }

    /// Number of races with pre-folded fields.
    pub fn len(&self) -> usize {
        self.folded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    fn fold_fields(&self, race: &Race) -> FoldedFields {
        let raw: Vec<String> = self
            .settings
            .keys
            .iter()
            .map(|(field, _)| field.read(race).to_string())
            .collect();
        let folded = raw.iter().map(|text| fold(text)).collect();
        FoldedFields { raw, folded }
    }

    /// Weighted score of one race; `None` when no field matches.
    fn score(&self, fields: &FoldedFields, term: &str) -> Option<f64> {
        if self.max_weight <= 0.0 {
            return None;
        }

        self.settings
            .keys
            .iter()
            .zip(&fields.folded)
            .filter_map(|((_, weight), text)| {
                field_score(text, term, self.settings.threshold)
                    .map(|score| score * weight / self.max_weight)
            })
            .reduce(f64::max)
    }
}

impl TextIndex for FuzzyIndex {
    fn rank(&self, candidates: &[&Race], term: &str) -> Vec<usize> {
        let term = fold(term);
        if term.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = candidates
            .iter()
            .enumerate()
            .filter_map(|(position, race)| {
                let key = identify(race, position);
                let cached = self.folded.get(&key).filter(|fields| {
                    key.is_stable() && fields.folded_from(race, &self.settings.keys)
                });
                let score = match cached {
                    Some(fields) => self.score(fields, &term),
                    None => self.score(&self.fold_fields(race), &term),
                };
                score.map(|score| (position, score))
            })
            .collect();

        // Stable sort keeps collection order among equal scores
        scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        scored.truncate(self.settings.limit);

        scored.into_iter().map(|(position, _)| position).collect()
    }
}

/// Case- and accent-insensitive substring matching, used while no fuzzy index
/// is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl TextIndex for SubstringMatcher {
    fn rank(&self, candidates: &[&Race], term: &str) -> Vec<usize> {
        let term = fold(term);
        if term.is_empty() {
            return Vec::new();
        }

        candidates
            .iter()
            .enumerate()
            .filter(|(_, race)| fold(&race.searchable_text()).contains(&term))
            .map(|(position, _)| position)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::{RaceDate, RaceId};
    use assert2::check;

    fn race(id: i64, name: &str, nick: Option<&str>, location: &str) -> Race {
        Race {
            id: Some(RaceId::Number(id)),
            name: Some(name.into()),
            nick_name: nick.map(String::from),
            location: Some(location.into()),
            ..Race::default()
        }
    }

    fn fixtures() -> Vec<Race> {
        vec![
            race(1, "Spring 5K", None, "Riverside Park"),
            race(2, "Rocky Trail Run", Some("The Rocky"), "Boulder"),
            race(3, "City Ultra", None, "Rocky Ford"),
            race(4, "Rockies Relay", None, "Denver"),
        ]
    }

    #[test]
    fn test_name_outranks_location() {
        let races = fixtures();
        let refs: Vec<&Race> = races.iter().collect();
        let index = FuzzyIndex::build(FuzzySettings::default(), &races);

        let ranked = index.rank(&refs, "rocky");
        check!(ranked.first() == Some(&1));
        check!(ranked.contains(&2));
        check!(!ranked.contains(&0));
    }

    #[test]
    fn test_typo_in_name() {
        let races = fixtures();
        let refs: Vec<&Race> = races.iter().collect();
        let index = FuzzyIndex::build(FuzzySettings::default(), &races);

        check!(index.rank(&refs, "sprnig").first() == Some(&0));
    }

    #[test]
    fn test_limit_caps_results() {
        let races = fixtures();
        let refs: Vec<&Race> = races.iter().collect();
        let settings = FuzzySettings {
            limit: 1,
            ..FuzzySettings::default()
        };
        let index = FuzzyIndex::build(settings, &races);

        check!(index.rank(&refs, "rocky").len() == 1);
    }

    #[test]
    fn test_unindexed_candidates_are_folded_on_demand() {
        let index = FuzzyIndex::new(FuzzySettings::default());
        let anonymous = Race {
            name: Some("Café Classic".into()),
            ..Race::default()
        };
        check!(index.is_empty());
        check!(index.rank(&[&anonymous], "cafe") == vec![0]);
    }

    #[test]
    fn test_positional_keys_not_cached() {
        let races = vec![Race {
            name: Some("Harbor Dash".into()),
            date: Some(RaceDate::new("TBD")),
            ..Race::default()
        }];
        // Name and raw date make a stable key even when the date is unparsable
        check!(FuzzyIndex::build(FuzzySettings::default(), &races).len() == 1);

        let positional = vec![Race {
            location: Some("Harbor".into()),
            ..Race::default()
        }];
        check!(FuzzyIndex::build(FuzzySettings::default(), &positional).is_empty());
    }

    #[test]
    fn test_shared_identity_scores_own_text() {
        let dash = |location: &str| Race {
            name: Some("Harbor Dash".into()),
            location: Some(location.into()),
            date: Some(RaceDate::new("2024-05-01")),
            ..Race::default()
        };
        let races = vec![dash("Portland"), dash("Seattle")];
        let index = FuzzyIndex::build(FuzzySettings::default(), &races);

        check!(index.rank(&[&races[0]], "seattle").is_empty());
        check!(index.rank(&[&races[1]], "seattle") == vec![0]);
        check!(index.rank(&[&races[0]], "portland") == vec![0]);

        // A race outside the built snapshot that reuses an indexed identity
        let elsewhere = dash("Tacoma");
        check!(index.rank(&[&elsewhere], "seattle").is_empty());
        check!(index.rank(&[&elsewhere], "tacoma") == vec![0]);
    }

    #[test]
    fn test_substring_fallback() {
        let races = fixtures();
        let refs: Vec<&Race> = races.iter().collect();

        check!(SubstringMatcher.rank(&refs, "ROCKY") == vec![1, 2]);
        check!(SubstringMatcher.rank(&refs, "the rocky") == vec![1]);
        check!(SubstringMatcher.rank(&refs, "50").is_empty());
        check!(SubstringMatcher.rank(&refs, "  ").is_empty());
    }
}
