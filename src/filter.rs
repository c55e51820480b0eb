//! Structured facet filtering.
//!
//! Facet groups combine with AND; toggles within the distance-class and
//! terrain groups combine with OR; feature flags must all hold.

use crate::race::{Format, Race, Terrain, parse_date};
use crate::search::DistanceClass;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Inclusive date bounds in either accepted date form; blank means open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    fn bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        let bound = |text: &Option<String>| text.as_deref().and_then(parse_date);
        (bound(&self.start), bound(&self.end))
    }
}

/// Inclusive distance bounds in kilometers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Filter state as sent by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub distance_range: DistanceRange,
    pub active_filters: Vec<String>,
    pub format_filter: Option<String>,
}

/// Feature flags a race can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Medal,
    Shirt,
    Reception,
}

impl Feature {
    pub const ALL: [Self; 3] = [Self::Medal, Self::Shirt, Self::Reception];

    pub const fn toggle(self) -> &'static str {
        match self {
            Self::Medal => "medal",
            Self::Shirt => "shirt",
            Self::Reception => "reception",
        }
    }

    fn is_offered_by(self, race: &Race) -> bool {
        match self {
            Self::Medal => race.medal,
            Self::Shirt => race.shirt,
            Self::Reception => race.reception,
        }
    }
}

/// One parsed `activeFilters` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Distance(DistanceClass),
    Terrain(Terrain),
    Feature(Feature),
}

impl Toggle {
    pub fn parse(toggle: &str) -> Option<Self> {
        if let Some(class) = DistanceClass::from_toggle(toggle) {
            return Some(Self::Distance(class));
        }

        let toggle = toggle.trim().to_lowercase();
        Terrain::ALL
            .into_iter()
            .find(|terrain| terrain.as_str().eq_ignore_ascii_case(&toggle))
            .map(Self::Terrain)
            .or_else(|| {
                Feature::ALL
                    .into_iter()
                    .find(|feature| feature.toggle() == toggle)
                    .map(Self::Feature)
            })
    }
}

/// Parse a format filter value. Blank and "all" mean no restriction.
pub fn parse_format(value: &str) -> Option<Format> {
    let value = value.trim();
    Format::ALL
        .into_iter()
        .find(|format| format.as_str().eq_ignore_ascii_case(value))
}

/// Criteria resolved into typed facets, ready to test races against.
#[derive(Debug, Clone, Default)]
struct Facets {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    min_km: Option<f64>,
    max_km: Option<f64>,
    classes: Vec<DistanceClass>,
    terrains: Vec<Terrain>,
    features: Vec<Feature>,
    format: Option<Format>,
}

impl Facets {
    fn resolve(criteria: &FilterCriteria) -> Self {
        let (start, end) = criteria.date_range.bounds();
        let mut facets = Self {
            start,
            end,
            min_km: criteria.distance_range.min.filter(|km| km.is_finite()),
            max_km: criteria.distance_range.max.filter(|km| km.is_finite()),
            format: criteria.format_filter.as_deref().and_then(parse_format),
            ..Self::default()
        };

        for raw in &criteria.active_filters {
            match Toggle::parse(raw) {
                Some(Toggle::Distance(class)) => facets.classes.push(class),
                Some(Toggle::Terrain(terrain)) => facets.terrains.push(terrain),
                Some(Toggle::Feature(feature)) => facets.features.push(feature),
                None => tracing::debug!(toggle = raw.as_str(), "ignoring unknown filter toggle"),
            }
        }

        facets
    }

    fn date_ok(&self, race: &Race) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        // A race without a usable date can't be shown to fall inside the range
        let Some(date) = race.date.as_ref().and_then(|d| d.date()) else {
            return false;
        };
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    fn distance_ok(&self, race: &Race) -> bool {
        let Some(km) = race.distance.km() else {
            return true;
        };
        self.min_km.is_none_or(|min| km >= min) && self.max_km.is_none_or(|max| km <= max)
    }

    fn accepts(&self, race: &Race) -> bool {
        self.date_ok(race)
            && self.distance_ok(race)
            && (self.classes.is_empty()
                || self.classes.iter().any(|class| class.contains(race.distance)))
            && (self.terrains.is_empty()
                || race.terrain.is_some_and(|terrain| self.terrains.contains(&terrain)))
            && self.features.iter().all(|feature| feature.is_offered_by(race))
            && self.format.is_none_or(|format| race.format == Some(format))
    }
}

/// Keep the races satisfying every active facet, preserving input order.
pub fn filter_races<R>(races: &[R], criteria: &FilterCriteria) -> Vec<R>
where
    R: Borrow<Race> + Clone,
{
    let facets = Facets::resolve(criteria);
    let filtered: Vec<R> = races
        .iter()
        .filter(|race| facets.accepts(<R as Borrow<Race>>::borrow(race)))
        .cloned()
        .collect();

    tracing::debug!(
        input = races.len(),
        output = filtered.len(),
        "applied structured filters"
    );

    filtered
}
