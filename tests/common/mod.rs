//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `sample_races`: the three-race catalog used by the end-to-end scenarios
//! - `catalog`: a larger mixed catalog with dates, formats and feature flags
//! - `dataset_file`: `catalog` written to a temporary JSON file

#![allow(dead_code)] // Each integration test crate uses a different subset

use race_finder::{Race, parse_races};
use rstest::fixture;
use std::borrow::Borrow;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Parse races from a JSON literal, panicking on malformed fixtures.
pub fn races_from_json(json: &str) -> Vec<Race> {
    parse_races(json).expect("fixture JSON should parse")
}

/// Names of `races`, in order.
pub fn names<R: Borrow<Race>>(races: &[R]) -> Vec<String> {
    races
        .iter()
        .map(|r| <R as Borrow<Race>>::borrow(r).name().to_string())
        .collect()
}

#[fixture]
pub fn sample_races() -> Vec<Race> {
    races_from_json(
        r#"[
            {"name": "Spring 5K", "distance": 5, "terrain": "Road"},
            {"name": "Rocky Trail Run", "distance": 21.1, "terrain": "Trail"},
            {"name": "City Ultra", "distance": 50}
        ]"#,
    )
}

pub const CATALOG_JSON: &str = r#"[
    {"id": 1, "name": "Harbor Half", "nickName": "The Salty Half", "location": "Portland, ME",
     "distance": 21.1, "terrain": "Road", "format": "Competitive", "date": "2024-05-12",
     "medal": true, "shirt": true, "reception": false},
    {"id": 2, "name": "Ridge Runner 10K", "location": "Boulder, CO", "distance": "10",
     "terrain": "Trail", "format": "Competitive", "date": "08/03/2024",
     "medal": true, "shirt": false},
    {"id": 3, "name": "Pancake Dash", "nickName": "Syrup Sprint", "location": "Burlington, VT",
     "distance": 5, "terrain": "Road", "format": "Fun", "date": "2025-01-05",
     "shirt": true, "reception": true},
    {"id": 4, "name": "Backyard Loop", "location": "Bell Buckle, TN",
     "distance": "Infinity", "terrain": "Trail", "format": "Competitive", "date": "2024-10-19"},
    {"id": 5, "name": "Capital Marathon", "location": "Montréal, QC",
     "distance": 42.2, "terrain": "Road", "format": "Competitive", "date": "2024-12-20",
     "medal": true, "reception": true},
    {"name": "Gravel Grinder", "location": "Emporia, KS", "distance": 100,
     "terrain": "Gravel", "date": "not a date"}
]"#;

#[fixture]
pub fn catalog() -> Vec<Race> {
    races_from_json(CATALOG_JSON)
}

/// A dataset written to a temporary directory, removed on drop.
pub struct DatasetFile {
    _temp: TempDir,
    path: PathBuf,
}

impl DatasetFile {
    pub fn new(json: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("races.json");
        std::fs::write(&path, json).expect("Failed to write dataset");
        Self { _temp: temp, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[fixture]
pub fn dataset_file() -> DatasetFile {
    DatasetFile::new(CATALOG_JSON)
}
