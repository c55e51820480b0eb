//! Whole-word keyword matching.
//!
//! A plain `contains` would let "10k" match inside "100k"; keywords here only
//! match when bounded by the start/end of the term or by whitespace.

use ahash::AHashMap;
use regex::Regex;
use std::ops::Range;
use std::sync::{LazyLock, RwLock};

/// Compiled boundary patterns, keyed by keyword. The vocabulary is small and fixed.
static PATTERNS: LazyLock<RwLock<AHashMap<String, Regex>>> =
    LazyLock::new(|| RwLock::new(AHashMap::new()));

/// Build the boundary pattern for a keyword. The keyword itself is captured so
/// its span excludes the surrounding whitespace.
fn boundary_pattern(keyword: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?:^|\s)({})(?:\s|$)", regex::escape(keyword))).ok()
}

fn with_pattern<T>(keyword: &str, f: impl FnOnce(&Regex) -> T) -> Option<T> {
    if let Ok(cache) = PATTERNS.read()
        && let Some(pattern) = cache.get(keyword)
    {
        return Some(f(pattern));
    }

    let pattern = boundary_pattern(keyword)?;
    let result = f(&pattern);
    if let Ok(mut cache) = PATTERNS.write() {
        cache.insert(keyword.to_string(), pattern);
    }
    Some(result)
}

/// Whether `keyword` occurs in `term` as a whole word or phrase.
///
/// Both inputs are expected lowercased; `term` is the full trimmed query.
pub fn matches(term: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    if term == keyword {
        return true;
    }
    with_pattern(keyword, |pattern| pattern.is_match(term)).unwrap_or(false)
}

/// Byte spans of every bounded occurrence of `keyword` in `term`.
///
/// Occurrences sharing a separating space ("5k 5k") are all reported.
pub(crate) fn find_spans(term: &str, keyword: &str) -> Vec<Range<usize>> {
    if keyword.is_empty() {
        return Vec::new();
    }

    with_pattern(keyword, |pattern| {
        let mut spans = Vec::new();
        let mut start = 0;
        while start <= term.len() {
            let Some(captures) = pattern.captures_at(term, start) else {
                break;
            };
            let Some(found) = captures.get(1) else {
                break;
            };
            spans.push(found.range());
            // Resume at the keyword end so a shared separator can start the next match
            start = found.end();
        }
        spans
    })
    .unwrap_or_default()
}
