//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for race-finder operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods at the application boundary.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when loading the race dataset fails.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Dataset file not found at the configured path.
    #[error("Race dataset not found at {}", path.display())]
    NotFound { path: PathBuf },
    /// The file exists but could not be read.
    #[error("Failed to read race dataset {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a JSON array of race records.
    #[error("Failed to parse race dataset {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Error returned when the configuration file cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
