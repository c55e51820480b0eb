pub mod list_facets;
pub mod search_races;

pub use list_facets::*;
pub use search_races::*;
