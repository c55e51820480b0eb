//! Loading the race dataset.
//!
//! The dataset is a JSON array of race records. It is read once per session
//! and kept as an immutable snapshot.

use crate::error::DatasetError;
use crate::race::Race;
use std::path::Path;
use std::sync::Arc;

/// Immutable, shareable collection of races.
pub type Snapshot = Arc<[Race]>;

/// Parse races from JSON text.
pub fn parse_races(json: &str) -> Result<Vec<Race>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read and parse the dataset at `path`.
pub async fn load_races(path: &Path) -> Result<Snapshot, DatasetError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(DatasetError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(DatasetError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let races = parse_races(&content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Loaded {} races from {}", races.len(), path.display());

    Ok(races.into())
}
