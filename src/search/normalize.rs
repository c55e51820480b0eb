//! Text folding shared by matching and name sorting.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Lowercase, strip diacritics and collapse whitespace.
///
/// "  Café   du  Lac " folds to "cafe du lac".
pub fn fold(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a user query the way the category matcher expects it.
pub(crate) fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}
