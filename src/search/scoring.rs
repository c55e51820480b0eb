//! Relevance scoring for fuzzy text matching.
//!
//! Scores live in `0.0..=1.0`. Literal hits always outrank typo-tolerant ones:
//! - 1.0: field equals the query
//! - 0.97: field starts with the query
//! - 0.94: field contains the query
//! - up to 0.9: best Jaro-Winkler similarity of a word window, scaled

use rapidfuzz::distance::jaro_winkler;

const PREFIX_SCORE: f64 = 0.97;
const CONTAINS_SCORE: f64 = 0.94;
const FUZZY_SCALE: f64 = 0.9;

/// Literal relevance of `query` within `text`. Both must already be folded.
pub(crate) fn calculate_relevance(text: &str, query: &str) -> Option<f64> {
    if text == query {
        Some(1.0)
    } else if text.starts_with(query) {
        Some(PREFIX_SCORE)
    } else if text.contains(query) {
        Some(CONTAINS_SCORE)
    } else {
        None
    }
}

/// Best similarity between `query` and any run of consecutive words in `text`
/// with as many words as the query. Short fields are compared whole.
pub(crate) fn window_similarity(text: &str, query: &str) -> f64 {
    let words: Vec<&str> = text.split(' ').filter(|w| !w.is_empty()).collect();
    let width = query.split(' ').filter(|w| !w.is_empty()).count().max(1);

    if words.len() <= width {
        return jaro_winkler::similarity(text.chars(), query.chars());
    }

    words
        .windows(width)
        .map(|window| {
            let candidate = window.join(" ");
            jaro_winkler::similarity(candidate.chars(), query.chars())
        })
        .fold(0.0, f64::max)
}

/// Score a folded field against a folded query.
///
/// Returns `None` when the field neither contains the query nor reaches the
/// similarity `threshold`.
pub(crate) fn field_score(text: &str, query: &str, threshold: f64) -> Option<f64> {
    if text.is_empty() || query.is_empty() {
        return None;
    }

    if let Some(score) = calculate_relevance(text, query) {
        return Some(score);
    }

    let similarity = window_similarity(text, query);
    (similarity >= threshold).then_some(similarity * FUZZY_SCALE)
}
