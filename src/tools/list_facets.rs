//! Dataset overview: facet counts, supported toggles and index readiness.

use crate::filter::Feature;
use crate::race::{Format, Terrain};
use crate::search::DistanceClass;
use crate::sort::SortOption;
use crate::worker::{IndexStatus, RaceState};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListFacetsRequest {
    /// Wait for the fuzzy search index to finish building before answering
    #[serde(default)]
    pub wait_for_index: bool,
}

/// Summarize the loaded dataset.
pub async fn handle_list_facets(state: &RaceState, request: &ListFacetsRequest) -> String {
    let status = if request.wait_for_index {
        state.wait_for_index().await
    } else {
        state.index_status()
    };
    render_facets(state, &status)
}

fn render_facets(state: &RaceState, status: &IndexStatus) -> String {
    let races = state.races();
    let mut output = format!(
        "{} races loaded from {}\n\n",
        races.len(),
        state.source().display()
    );

    output.push_str("Distance:\n");
    for class in DistanceClass::ALL {
        let count = races.iter().filter(|r| class.contains(r.distance)).count();
        let _ = writeln!(output, "• {}: {}", class.toggle(), count);
    }

    output.push_str("\nTerrain:\n");
    for terrain in Terrain::ALL {
        let count = races.iter().filter(|r| r.terrain == Some(terrain)).count();
        let _ = writeln!(output, "• {}: {}", terrain.as_str(), count);
    }

    output.push_str("\nFormat:\n");
    for format in Format::ALL {
        let count = races.iter().filter(|r| r.format == Some(format)).count();
        let _ = writeln!(output, "• {}: {}", format.as_str(), count);
    }

    let toggles: Vec<String> = DistanceClass::ALL
        .iter()
        .map(|c| c.toggle().to_string())
        .chain(Terrain::ALL.iter().map(|t| t.as_str().to_lowercase()))
        .chain(Feature::ALL.iter().map(|f| f.toggle().to_string()))
        .collect();
    let sorts: Vec<&str> = SortOption::ALL.iter().map(|o| o.as_str()).collect();

    let _ = writeln!(output, "\nFilter toggles: {}", toggles.join(", "));
    let _ = writeln!(output, "Sort options: {}", sorts.join(", "));

    let index = match status {
        IndexStatus::Building => "building (substring matching until ready)".to_string(),
        IndexStatus::Ready { indexed } => format!("ready ({} races indexed)", indexed),
        IndexStatus::Failed(e) => format!("unavailable, using substring matching ({})", e),
    };
    let _ = writeln!(output, "Fuzzy search index: {}", index);

    output
}
