//! Faceted race search handler.

use crate::filter::{DateRange, DistanceRange, FilterCriteria, parse_format};
use crate::pipeline::RaceQuery;
use crate::race::{Race, parse_date};
use crate::sort::SortOption;
use crate::worker::RaceState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRacesRequest {
    /// Free text: race name, nickname, location, or a category like "half marathon", "trail", "fun run"
    pub query: Option<String>,
    /// Earliest race date, YYYY-MM-DD or MM/DD/YYYY (inclusive)
    pub start_date: Option<String>,
    /// Latest race date, YYYY-MM-DD or MM/DD/YYYY (inclusive)
    pub end_date: Option<String>,
    /// Minimum distance in kilometers (inclusive)
    pub min_distance: Option<f64>,
    /// Maximum distance in kilometers (inclusive)
    pub max_distance: Option<f64>,
    /// Toggles: 5k, 10k, half, full, ultra, trail, road, gravel, track, medal, shirt, reception
    pub filters: Vec<String>,
    /// Race format: Fun or Competitive
    pub format: Option<String>,
    /// Sort order: date-asc, date-desc, distance-asc, distance-desc, name-asc, name-desc
    pub sort: Option<String>,
    /// Maximum number of results to return
    pub limit: Option<usize>,
}

impl SearchRacesRequest {
    /// Validate the request and convert it into a pipeline query.
    pub fn to_query(&self) -> Result<RaceQuery, String> {
        for (label, value) in [("startDate", &self.start_date), ("endDate", &self.end_date)] {
            if let Some(text) = non_blank(value)
                && parse_date(text).is_none()
            {
                return Err(format!(
                    "Invalid {} '{}'. Use YYYY-MM-DD or MM/DD/YYYY.",
                    label, text
                ));
            }
        }

        if let Some(sort) = non_blank(&self.sort)
            && SortOption::parse(sort).is_none()
        {
            let options: Vec<&str> = SortOption::ALL.iter().map(|o| o.as_str()).collect();
            return Err(format!(
                "Unknown sort '{}'. Valid options: {}",
                sort,
                options.join(", ")
            ));
        }

        if let Some(format) = non_blank(&self.format)
            && !format.eq_ignore_ascii_case("all")
            && parse_format(format).is_none()
        {
            return Err(format!(
                "Unknown format '{}'. Valid options: Fun, Competitive",
                format
            ));
        }

        Ok(RaceQuery {
            query: self.query.clone().unwrap_or_default(),
            criteria: FilterCriteria {
                date_range: DateRange {
                    start: self.start_date.clone(),
                    end: self.end_date.clone(),
                },
                distance_range: DistanceRange {
                    min: self.min_distance,
                    max: self.max_distance,
                },
                active_filters: self.filters.clone(),
                format_filter: self.format.clone(),
            },
            sort_option: self.sort.clone(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Run a search against the session's race snapshot.
pub fn handle_search_races(
    state: &RaceState,
    request: &SearchRacesRequest,
    default_limit: usize,
) -> Result<String, String> {
    let query = request.to_query()?;
    let results = state.query(&query);
    let limit = request.limit.unwrap_or(default_limit).max(1);

    tracing::debug!(
        query = query.query.as_str(),
        matched = results.len(),
        limit,
        "search_races"
    );

    if results.is_empty() {
        return Ok(no_results_message(request));
    }

    Ok(format_results(&results, limit, &query.query))
}

fn no_results_message(request: &SearchRacesRequest) -> String {
    let mut msg = match non_blank(&request.query) {
        Some(text) => format!("No races found for '{}'.\n\n", text),
        None => "No races match the selected filters.\n\n".to_string(),
    };

    msg.push_str("Search tips:\n");
    msg.push_str("• Try a shorter name or a city\n");
    msg.push_str("• Search by category: '5k', 'half marathon', 'trail', 'fun run'\n");
    msg.push_str("• Small typos are tolerated once the search index is ready\n");

    if !request.filters.is_empty() || request.format.is_some() {
        msg.push_str("• Remove some filter toggles to widen the search\n");
    }
    if request.start_date.is_some() || request.end_date.is_some() {
        msg.push_str("• Races without a listed date are excluded by date bounds\n");
    }

    msg
}

fn format_results(results: &[&Race], limit: usize, query: &str) -> String {
    let shown = results.len().min(limit);
    let mut output = if query.trim().is_empty() {
        format!("{} races found", results.len())
    } else {
        format!("{} races found for '{}'", results.len(), query.trim())
    };
    if shown < results.len() {
        let _ = write!(output, " (showing first {})", shown);
    }
    output.push_str(":\n\n");

    for (idx, race) in results.iter().take(limit).enumerate() {
        format_race(&mut output, idx + 1, race);
        output.push('\n');
    }

    output
}

fn format_race(output: &mut String, number: usize, race: &Race) {
    let name = if race.name().is_empty() {
        "(unnamed race)"
    } else {
        race.name()
    };
    let _ = write!(output, "{}. {} ({})", number, name, race.distance);
    if !race.nick_name().is_empty() {
        let _ = write!(output, " aka \"{}\"", race.nick_name());
    }
    output.push('\n');

    let mut details = Vec::new();
    if let Some(date) = &race.date {
        details.push(date.to_string());
    }
    if !race.location().is_empty() {
        details.push(race.location().to_string());
    }
    if let Some(terrain) = race.terrain {
        details.push(terrain.as_str().to_string());
    }
    if let Some(format) = race.format {
        details.push(format.as_str().to_string());
    }
    let perks: Vec<&str> = [
        (race.medal, "medal"),
        (race.shirt, "shirt"),
        (race.reception, "reception"),
    ]
    .into_iter()
    .filter_map(|(offered, label)| offered.then_some(label))
    .collect();
    if !perks.is_empty() {
        details.push(perks.join(", "));
    }
    if !details.is_empty() {
        let _ = writeln!(output, "   {}", details.join(" | "));
    }

    if let Some(website) = race.website.as_deref().filter(|w| !w.trim().is_empty()) {
        let _ = writeln!(output, "   {}", website.trim());
    }
}
