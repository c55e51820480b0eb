//! Faceted race discovery: keyword, category and fuzzy text search combined
//! with structured filters and sorting, served over MCP.

pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod race;
pub mod search;
pub mod server;
pub mod sort;
pub mod tools;
pub mod tracing;
pub mod worker;

pub use config::Config;
pub use dataset::{Snapshot, load_races, parse_races};
pub use filter::{FilterCriteria, filter_races};
pub use pipeline::{RaceQuery, run_query};
pub use race::{Distance, Race, RaceDate, RaceKey};
pub use search::{FuzzyIndex, TextIndex, matches_category, search_races};
pub use server::RaceServer;
pub use sort::{SortOption, sort_races};
pub use worker::RaceState;
