//! Free-text race search.
//!
//! This module merges two matching strategies: typo-tolerant text matching
//! over race names, nicknames and locations, and rule-based category inference
//! ("trail", "half marathon", "fun run") over structured race fields.

// Module declarations
pub(crate) mod category;
pub(crate) mod fuzzy;
pub(crate) mod keyword;
pub(crate) mod normalize;
pub(crate) mod orchestrator;
pub(crate) mod scoring;

// Public re-exports (used via lib.rs)
pub use category::{DISTANCE_TOLERANCE_KM, DistanceClass, MARATHON_KM, matches_category};
pub use fuzzy::{Field, FuzzyIndex, FuzzySettings, SubstringMatcher, TextIndex};
pub use keyword::matches as matches_keyword;
pub use normalize::fold;
pub use orchestrator::search_races;
