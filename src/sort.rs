//! Final ordering of result lists.

use crate::race::{Race, cmp_month_day};
use crate::search::fold;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    DateAsc,
    DateDesc,
    DistanceAsc,
    DistanceDesc,
    NameAsc,
    NameDesc,
}

impl SortOption {
    pub const ALL: [Self; 6] = [
        Self::DateAsc,
        Self::DateDesc,
        Self::DistanceAsc,
        Self::DistanceDesc,
        Self::NameAsc,
        Self::NameDesc,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateAsc => "date-asc",
            Self::DateDesc => "date-desc",
            Self::DistanceAsc => "distance-asc",
            Self::DistanceDesc => "distance-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }

    /// Parse a sort option; unknown values mean "keep the current order".
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|option| option.as_str().eq_ignore_ascii_case(value))
    }

    fn compare(self, a: &Race, b: &Race) -> Ordering {
        match self {
            Self::DateAsc => cmp_month_day(a.date.as_ref(), b.date.as_ref()),
            Self::DateDesc => cmp_date_desc(a, b),
            Self::DistanceAsc => a.distance.total_cmp(b.distance),
            Self::DistanceDesc => b.distance.total_cmp(a.distance),
            Self::NameAsc => cmp_names(a.name(), b.name()),
            Self::NameDesc => cmp_names(b.name(), a.name()),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest calendar position first, with undated races still last.
fn cmp_date_desc(a: &Race, b: &Race) -> Ordering {
    let a_day = a.date.as_ref().and_then(|d| d.month_day());
    let b_day = b.date.as_ref().and_then(|d| d.month_day());
    match (a_day, b_day) {
        (Some(a_day), Some(b_day)) => b_day.cmp(&a_day),
        _ => cmp_month_day(a.date.as_ref(), b.date.as_ref()),
    }
}

/// Accent- and case-insensitive name order, raw text as tie-breaker.
fn cmp_names(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

/// Stable sort of `races` by `option`. `None` keeps the input order.
pub fn sort_races<R>(races: &[R], option: Option<SortOption>) -> Vec<R>
where
    R: Borrow<Race> + Clone,
{
    let mut sorted = races.to_vec();
    if let Some(option) = option {
        sorted.sort_by(|a, b| {
            option.compare(<R as Borrow<Race>>::borrow(a), <R as Borrow<Race>>::borrow(b))
        });
    }
    sorted
}
