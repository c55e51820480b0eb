//! Full query evaluation: structured filters, then search, then sort.

use crate::filter::{FilterCriteria, filter_races};
use crate::race::Race;
use crate::search::{TextIndex, search_races};
use crate::sort::{SortOption, sort_races};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Everything the presentation layer sends for one result list.
///
/// Deserializes from the flat camelCase shape
/// `{ query, dateRange, distanceRange, activeFilters, formatFilter, sortOption }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RaceQuery {
    pub query: String,
    #[serde(flatten)]
    pub criteria: FilterCriteria,
    pub sort_option: Option<String>,
}

impl RaceQuery {
    pub fn sort(&self) -> Option<SortOption> {
        self.sort_option.as_deref().and_then(SortOption::parse)
    }
}

/// Evaluate `request` against `races`.
pub fn run_query<R>(races: &[R], request: &RaceQuery, index: Option<&dyn TextIndex>) -> Vec<R>
where
    R: Borrow<Race> + Clone,
{
    let filtered = filter_races(races, &request.criteria);
    let found = search_races(&filtered, &request.query, index);
    sort_races(&found, request.sort())
}
