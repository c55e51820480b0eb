//! Rule-based category inference from free-text queries.
//!
//! A query like "trail half" should surface races whose structured fields say
//! they are trail races or half marathons, even when neither word appears in
//! the race name. Each category owns its keyword set; a query matches a race
//! when one of the category keywords occurs in the query as a whole word and
//! the race's field agrees with the category.
//!
//! When keywords of different categories overlap ("half marathon" contains
//! "marathon"), the longer occurrence wins and the shorter one is ignored.

use super::keyword::{find_spans, matches};
use super::normalize::normalize_query;
use crate::race::{Distance, Format, Race, Terrain};
use std::ops::Range;

/// Slack allowed between a course's measured distance and its nominal class.
pub const DISTANCE_TOLERANCE_KM: f64 = 0.5;

/// Anything strictly longer than a marathon is an ultra.
pub const MARATHON_KM: f64 = 42.2;

/// Standard race distance classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceClass {
    FiveK,
    TenK,
    Half,
    Marathon,
    Ultra,
}

impl DistanceClass {
    pub const ALL: [Self; 5] = [
        Self::FiveK,
        Self::TenK,
        Self::Half,
        Self::Marathon,
        Self::Ultra,
    ];

    /// Free-text keywords that name this class.
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::FiveK => &["5k", "5km", "5 k", "5 km", "5k run"],
            Self::TenK => &["10k", "10km", "10 k", "10 km"],
            Self::Half => &[
                "half marathon",
                "halfmarathon",
                "half",
                "21.1km",
                "21.1k",
                "21km",
                "21k",
                "13.1",
                "13.1mi",
            ],
            Self::Marathon => &[
                "marathon",
                "full marathon",
                "full",
                "42.2km",
                "42.2k",
                "42km",
                "42k",
                "26.2",
                "26.2mi",
            ],
            Self::Ultra => &["ultra", "ultras", "ultramarathon", "ultra marathon"],
        }
    }

    /// Nominal distance in kilometers. Ultra has a lower bound instead.
    pub const fn target_km(self) -> Option<f64> {
        match self {
            Self::FiveK => Some(5.0),
            Self::TenK => Some(10.0),
            Self::Half => Some(21.1),
            Self::Marathon => Some(MARATHON_KM),
            Self::Ultra => None,
        }
    }

    /// Whether a race distance belongs to this class.
    pub fn contains(self, distance: Distance) -> bool {
        match self.target_km() {
            Some(target) => distance.is_near(target, DISTANCE_TOLERANCE_KM),
            None => distance.exceeds(MARATHON_KM),
        }
    }

    /// Parse a filter-chip toggle ("5k", "10k", "half", "full", "ultra").
    pub fn from_toggle(toggle: &str) -> Option<Self> {
        match toggle.trim().to_lowercase().as_str() {
            "5k" => Some(Self::FiveK),
            "10k" => Some(Self::TenK),
            "half" | "half-marathon" | "halfmarathon" => Some(Self::Half),
            "full" | "marathon" | "full-marathon" => Some(Self::Marathon),
            "ultra" => Some(Self::Ultra),
            _ => None,
        }
    }

    pub const fn toggle(self) -> &'static str {
        match self {
            Self::FiveK => "5k",
            Self::TenK => "10k",
            Self::Half => "half",
            Self::Marathon => "full",
            Self::Ultra => "ultra",
        }
    }
}

const TERRAIN_KEYWORDS: &[(&str, Terrain)] = &[
    ("trail", Terrain::Trail),
    ("trails", Terrain::Trail),
    ("road", Terrain::Road),
    ("roads", Terrain::Road),
    ("gravel", Terrain::Gravel),
    ("track", Terrain::Track),
];

const FORMAT_KEYWORDS: &[(&str, Format)] = &[
    ("fun run", Format::Fun),
    ("funrun", Format::Fun),
    ("fun", Format::Fun),
    ("competitive", Format::Competitive),
    ("competition", Format::Competitive),
];

/// Which category a keyword belongs to, for overlap resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Distance(DistanceClass),
    Terrain(Terrain),
    Format(Format),
}

impl Category {
    fn accepts(self, race: &Race) -> bool {
        match self {
            Self::Distance(class) => class.contains(race.distance),
            Self::Terrain(terrain) => race.terrain == Some(terrain),
            Self::Format(format) => race.format == Some(format),
        }
    }
}

fn vocabulary() -> impl Iterator<Item = (&'static str, Category)> {
    let distances = DistanceClass::ALL.into_iter().flat_map(|class| {
        class
            .keywords()
            .iter()
            .map(move |keyword| (*keyword, Category::Distance(class)))
    });
    let terrains = TERRAIN_KEYWORDS
        .iter()
        .map(|(keyword, terrain)| (*keyword, Category::Terrain(*terrain)));
    let formats = FORMAT_KEYWORDS
        .iter()
        .map(|(keyword, format)| (*keyword, Category::Format(*format)));

    distances.chain(terrains).chain(formats)
}

/// A keyword occurrence in the query, tagged with its category.
#[derive(Debug, Clone)]
struct Hit {
    span: Range<usize>,
    category: Category,
}

impl Hit {
    /// Strictly inside a longer occurrence belonging to another category.
    fn is_shadowed_by(&self, other: &Self) -> bool {
        other.category != self.category
            && other.span.start <= self.span.start
            && self.span.end <= other.span.end
            && other.span.len() > self.span.len()
    }
}

/// Categories named by `query`, after longest-keyword resolution.
///
/// `query` must already be normalized (trimmed, lowercased).
fn categories_in(query: &str) -> Vec<Category> {
    let hits: Vec<Hit> = vocabulary()
        .filter(|(keyword, _)| matches(query, keyword))
        .flat_map(|(keyword, category)| {
            let mut spans = find_spans(query, keyword);
            // Exact equality always counts even if the pattern found nothing
            if spans.is_empty() && query == keyword {
                spans.push(0..query.len());
            }
            spans.into_iter().map(move |span| Hit { span, category })
        })
        .collect();

    let mut categories: Vec<Category> = Vec::new();
    for hit in &hits {
        if hits.iter().any(|other| hit.is_shadowed_by(other)) {
            continue;
        }
        if !categories.contains(&hit.category) {
            categories.push(hit.category);
        }
    }
    categories
}

/// Whether `race` matches a category named in the free-text `query`.
///
/// Returns `false` for blank queries. A query may name several categories;
/// matching any one of them is enough.
pub fn matches_category(race: &Race, query: &str) -> bool {
    let query = normalize_query(query);
    if query.is_empty() {
        return false;
    }

    categories_in(&query)
        .into_iter()
        .any(|category| category.accepts(race))
}

/// Positions of the races matching a category of `query`, in input order.
pub(crate) fn category_matches(races: &[&Race], query: &str) -> Vec<usize> {
    let query = normalize_query(query);
    if query.is_empty() {
        return Vec::new();
    }

    let categories = categories_in(&query);
    if categories.is_empty() {
        return Vec::new();
    }

    races
        .iter()
        .enumerate()
        .filter(|(_, race)| categories.iter().any(|category| category.accepts(race)))
        .map(|(index, _)| index)
        .collect()
}
