mod common;

use assert2::check;
use common::{catalog, names, races_from_json, sample_races};
use race_finder::search::{FuzzySettings, TextIndex};
use race_finder::{Distance, FuzzyIndex, Race, RaceKey, matches_category, search_races};
use rstest::rstest;
use std::collections::HashSet;

fn at(km: f64) -> Race {
    Race {
        distance: Distance::Finite(km),
        ..Race::default()
    }
}

// --- End-to-end scenarios ---

#[rstest]
fn trail_query_returns_only_trail_race(sample_races: Vec<Race>) {
    let found = search_races(&sample_races, "trail", None);
    check!(names(&found) == ["Rocky Trail Run"]);
}

#[rstest]
fn numeric_query_without_index_matches_nothing(sample_races: Vec<Race>) {
    check!(search_races(&sample_races, "50", None).is_empty());
}

#[rstest]
fn ultra_query_matches_by_category(sample_races: Vec<Race>) {
    let found = search_races(&sample_races, "ultra", None);
    check!(names(&found) == ["City Ultra"]);
}

#[rstest]
#[case("trail")]
#[case("half")]
#[case("road")]
#[case("a")]
#[case("marathon")]
fn results_are_unique_members_of_input(catalog: Vec<Race>, #[case] query: &str) {
    let index = FuzzyIndex::build(FuzzySettings::default(), &catalog);

    for index in [None, Some(&index as &dyn TextIndex)] {
        let found = search_races(&catalog, query, index);

        check!(found.iter().all(|race| catalog.contains(race)));
        let unique: HashSet<String> = names(&found).into_iter().collect();
        check!(unique.len() == found.len());
    }
}

#[test]
fn duplicate_identities_are_collapsed() {
    let races = races_from_json(
        r#"[
            {"id": 7, "name": "Trail Days", "terrain": "Trail"},
            {"id": 7, "name": "Trail Days (copy)", "terrain": "Trail"}
        ]"#,
    );
    let found = search_races(&races, "trail", None);
    check!(names(&found) == ["Trail Days"]);
}

// --- Category matching properties ---

#[rstest]
#[case("trail")]
#[case("trails")]
#[case("TRAIL")]
fn terrain_keywords_share_a_bucket(#[case] query: &str) {
    let race = races_from_json(r#"[{"name": "Hill Climb", "terrain": "Trail"}]"#).remove(0);
    check!(matches_category(&race, query));
}

#[rstest]
#[case(10.0, true)]
#[case(9.6, true)]
#[case(10.5, true)]
#[case(9.4, false)]
#[case(10.6, false)]
#[case(100.0, false)]
fn ten_k_tolerance_band(#[case] km: f64, #[case] expected: bool) {
    check!(matches_category(&at(km), "10k") == expected);
}

#[rstest]
#[case("half", 21.1, true)]
#[case("half", 42.2, false)]
#[case("marathon", 42.2, true)]
#[case("half marathon", 21.1, true)]
#[case("half marathon", 42.2, false)]
#[case("ultra", 42.2, false)]
#[case("ultra", 42.3, true)]
#[case("ultra marathon", 42.2, false)]
#[case("half price entry", 21.1, true)]
fn distance_keywords(#[case] query: &str, #[case] km: f64, #[case] expected: bool) {
    check!(matches_category(&at(km), query) == expected);
}

#[test]
fn unbounded_distance_is_ultra_only() {
    let race = Race {
        distance: Distance::Unbounded,
        ..Race::default()
    };
    check!(matches_category(&race, "ultra"));
    check!(!matches_category(&race, "marathon"));
    check!(!matches_category(&race, "10k"));
}

// --- Fuzzy index ---

#[rstest]
fn fuzzy_index_matches_nicknames_and_accents(catalog: Vec<Race>) {
    let index = FuzzyIndex::build(FuzzySettings::default(), &catalog);

    let found = search_races(&catalog, "salty", Some(&index));
    check!(names(&found) == ["Harbor Half"]);

    let found = search_races(&catalog, "montreal", Some(&index));
    check!(names(&found) == ["Capital Marathon"]);
}

#[rstest]
fn fuzzy_index_tolerates_typos(catalog: Vec<Race>) {
    let index = FuzzyIndex::build(FuzzySettings::default(), &catalog);

    let found = search_races(&catalog, "pancke", Some(&index));
    check!(names(&found).first().map(String::as_str) == Some("Pancake Dash"));
    check!(search_races(&catalog, "pancke", None).is_empty());
}

#[rstest]
fn index_covers_only_stable_identities(catalog: Vec<Race>) {
    let index = FuzzyIndex::build(FuzzySettings::default(), &catalog);
    let stable = race_finder::race::identify_all(&catalog)
        .iter()
        .filter(|key: &&RaceKey| key.is_stable())
        .count();

    // "Gravel Grinder" has a name and a raw date, so every race is stable
    check!(index.len() == stable);
    check!(stable == catalog.len());
}

#[test]
fn races_sharing_an_identity_match_on_their_own_text() {
    let races = races_from_json(
        r#"[
            {"name": "Harbor Dash", "date": "2024-05-01", "location": "Portland"},
            {"name": "Harbor Dash", "date": "2024-05-01", "location": "Seattle"}
        ]"#,
    );
    let index = FuzzyIndex::build(FuzzySettings::default(), &races);
    let portland = &races[..1];

    check!(search_races(portland, "seattle", Some(&index)).is_empty());
    check!(search_races(portland, "seattle", None).is_empty());
    check!(search_races(portland, "portland", Some(&index)) == portland);
}
