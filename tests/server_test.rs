mod common;

use assert2::check;
use common::{DatasetFile, dataset_file, sample_races};
use futures::FutureExt;
use race_finder::tools::{
    ListFacetsRequest, SearchRacesRequest, handle_list_facets, handle_search_races,
};
use race_finder::worker::IndexStatus;
use race_finder::{Config, Race, RaceServer, RaceState};
use rmcp::ServerHandler;
use rstest::rstest;
use std::path::{Path, PathBuf};

fn config_for(path: &Path) -> Config {
    Config {
        dataset: path.to_path_buf(),
        ..Config::default()
    }
}

fn search(query: &str) -> SearchRacesRequest {
    SearchRacesRequest {
        query: Some(query.into()),
        ..SearchRacesRequest::default()
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn loads_dataset_and_builds_index(dataset_file: DatasetFile) {
    let state = RaceState::load(&config_for(dataset_file.path()))
        .await
        .unwrap();

    check!(state.races().len() == 6);
    check!(state.wait_for_index().await == IndexStatus::Ready { indexed: 6 });
    check!(state.text_index().is_some());
}

#[tokio::test]
async fn missing_dataset_is_an_error() {
    let err = RaceState::load(&config_for(&PathBuf::from("/nonexistent/races.json")))
        .await
        .unwrap_err();
    check!(format!("{:#}", err).contains("not found"));
}

#[rstest]
#[tokio::test]
async fn searches_fall_back_before_index_is_ready(sample_races: Vec<Race>) {
    let state = RaceState::with_index_future(
        Path::new("races.json"),
        sample_races.into(),
        futures::future::pending().boxed(),
    );

    check!(state.text_index().is_none());

    let output = handle_search_races(&state, &search("trail"), 20).unwrap();
    check!(output.starts_with("1 races found for 'trail'"));
    check!(output.contains("1. Rocky Trail Run (21.1 km)"));
    check!(!output.contains("City Ultra"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_tool_formats_results(dataset_file: DatasetFile) {
    let state = RaceState::load(&config_for(dataset_file.path()))
        .await
        .unwrap();
    state.wait_for_index().await;

    let request = SearchRacesRequest {
        filters: vec!["medal".into()],
        sort: Some("distance-asc".into()),
        limit: Some(2),
        ..SearchRacesRequest::default()
    };
    let output = handle_search_races(&state, &request, 20).unwrap();

    check!(output.starts_with("3 races found (showing first 2)"));
    check!(output.contains("1. Ridge Runner 10K (10 km)"));
    check!(output.contains("2024-08-03 | Boulder, CO | Trail | Competitive | medal"));
    check!(output.contains("2. Harbor Half (21.1 km) aka \"The Salty Half\""));
    check!(!output.contains("Capital Marathon"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_results_include_tips(dataset_file: DatasetFile) {
    let state = RaceState::load(&config_for(dataset_file.path()))
        .await
        .unwrap();

    let request = SearchRacesRequest {
        query: Some("zzzzzz".into()),
        start_date: Some("2024-01-01".into()),
        ..SearchRacesRequest::default()
    };
    let output = handle_search_races(&state, &request, 20).unwrap();

    check!(output.starts_with("No races found for 'zzzzzz'"));
    check!(output.contains("Search tips:"));
    check!(output.contains("without a listed date"));
}

#[rstest]
#[tokio::test]
async fn invalid_request_is_rejected(sample_races: Vec<Race>) {
    let state = RaceState::with_index_future(
        Path::new("races.json"),
        sample_races.into(),
        futures::future::pending().boxed(),
    );
    let request = SearchRacesRequest {
        end_date: Some("tomorrow".into()),
        ..SearchRacesRequest::default()
    };

    let err = handle_search_races(&state, &request, 20).unwrap_err();
    check!(err.contains("endDate"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn facets_report_counts(dataset_file: DatasetFile) {
    let state = RaceState::load(&config_for(dataset_file.path()))
        .await
        .unwrap();

    let output = handle_list_facets(
        &state,
        &ListFacetsRequest {
            wait_for_index: true,
        },
    )
    .await;

    check!(output.starts_with("6 races loaded"));
    check!(output.contains("• ultra: 2"));
    check!(output.contains("• Road: 3"));
    check!(output.contains("• Competitive: 4"));
    check!(output.contains("Fuzzy search index: ready (6 races indexed)"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn server_loads_from_config(dataset_file: DatasetFile) {
    let server = RaceServer::from_config(&config_for(dataset_file.path()))
        .await
        .unwrap();

    check!(server.state().races().len() == 6);
    check!(server.state().source() == dataset_file.path());

    let info = server.get_info();
    check!(info.capabilities.tools.is_some());
    check!(info.instructions.is_some_and(|text| text.contains("search_races")));
}
