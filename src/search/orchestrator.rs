//! Combines text matches and category matches into one result list.

use super::category::category_matches;
use super::fuzzy::{SubstringMatcher, TextIndex};
use crate::race::{Race, RaceKey, identify_all};
use ahash::AHashSet;
use std::borrow::Borrow;

/// Search `races` for `query`.
///
/// Text matches come first in the order the index ranked them (or collection
/// order for the substring fallback used when `index` is `None`), followed by
/// races that only match by category, in collection order. A race appears at
/// most once, judged by its identity within `races`. Blank queries return the
/// collection unchanged.
pub fn search_races<R>(races: &[R], query: &str, index: Option<&dyn TextIndex>) -> Vec<R>
where
    R: Borrow<Race> + Clone,
{
    if query.trim().is_empty() {
        return races.to_vec();
    }

    let candidates: Vec<&Race> = races.iter().map(<R as Borrow<Race>>::borrow).collect();
    let keys: Vec<RaceKey> = identify_all(candidates.iter().copied());

    let text_matches = match index {
        Some(index) => index.rank(&candidates, query),
        None => SubstringMatcher.rank(&candidates, query),
    };
    let category_hits = category_matches(&candidates, query);

    let mut seen: AHashSet<&RaceKey> = AHashSet::with_capacity(text_matches.len());
    let mut results = Vec::with_capacity(text_matches.len() + category_hits.len());

    for position in text_matches.iter().chain(&category_hits).copied() {
        // Guard against indexes returning positions outside the collection
        let Some(key) = keys.get(position) else {
            tracing::warn!(position, "text index returned an out-of-range position");
            continue;
        };
        if seen.insert(key) {
            results.push(races[position].clone());
        }
    }

    tracing::debug!(
        query,
        text = text_matches.len(),
        category = category_hits.len(),
        results = results.len(),
        fuzzy = index.is_some(),
        "search complete"
    );

    results
}
