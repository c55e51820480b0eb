//! Session state: the race snapshot and the fuzzy index built in the background.
//!
//! The snapshot is available as soon as the dataset is parsed. The fuzzy index
//! is built on a blocking thread; until it is ready (or if building it fails),
//! searches use plain substring matching instead of waiting.

use crate::config::Config;
use crate::dataset::{Snapshot, load_races};
use crate::error::Result;
use crate::pipeline::{RaceQuery, run_query};
use crate::race::Race;
use crate::search::{FuzzyIndex, FuzzySettings, TextIndex};
use anyhow::Context;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of an index build; errors are stringified so the future is `Clone`.
type IndexResult = std::result::Result<Arc<FuzzyIndex>, String>;

/// Type alias for the shared index build future.
type SharedIndexFuture = Shared<BoxFuture<'static, IndexResult>>;

/// Readiness of the fuzzy index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStatus {
    Building,
    Ready { indexed: usize },
    Failed(String),
}

/// Shared state for one session.
pub struct RaceState {
    /// Where the snapshot was loaded from
    source: PathBuf,

    /// Immutable race collection
    snapshot: Snapshot,

    /// In-flight or completed index build (can be awaited by multiple callers)
    index: SharedIndexFuture,

    /// Whether a build failure was already logged
    failure_logged: AtomicBool,
}

impl std::fmt::Debug for RaceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceState")
            .field("source", &self.source)
            .field("races", &self.snapshot.len())
            .field("index", &self.index_status())
            .finish()
    }
}

impl RaceState {
    /// Load the dataset named by `config` and start building the fuzzy index.
    pub async fn load(config: &Config) -> Result<Self> {
        let snapshot = load_races(&config.dataset)
            .await
            .with_context(|| format!("Failed to load races for {}", config.dataset.display()))?;

        Ok(Self::from_snapshot(
            &config.dataset,
            snapshot,
            config.fuzzy.to_settings(),
        ))
    }

    /// Wrap an already-loaded snapshot. Must be called inside a Tokio runtime.
    pub fn from_snapshot(source: &Path, snapshot: Snapshot, settings: FuzzySettings) -> Self {
        let races = snapshot.clone();
        let build = tokio::task::spawn_blocking(move || FuzzyIndex::build(settings, &races));
        Self::with_index_future(source, snapshot, build.map(flatten_join).boxed())
    }

    /// Wrap a snapshot with a caller-provided index future.
    pub fn with_index_future(
        source: &Path,
        snapshot: Snapshot,
        index: BoxFuture<'static, IndexResult>,
    ) -> Self {
        Self {
            source: source.to_path_buf(),
            snapshot,
            index: index.shared(),
            failure_logged: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn races(&self) -> &[Race] {
        &self.snapshot
    }

    /// The fuzzy index if it is ready, without waiting.
    pub fn text_index(&self) -> Option<Arc<FuzzyIndex>> {
        // Polling once lets a finished build publish its output to `peek`
        let _ = self.index.clone().now_or_never();

        match self.index.peek()? {
            Ok(index) => Some(index.clone()),
            Err(e) => {
                if !self.failure_logged.swap(true, Ordering::Relaxed) {
                    tracing::warn!("Fuzzy index unavailable, using substring search: {}", e);
                }
                None
            }
        }
    }

    /// Wait for the index build to finish.
    pub async fn wait_for_index(&self) -> IndexStatus {
        let _ = self.index.clone().await;
        self.index_status()
    }

    pub fn index_status(&self) -> IndexStatus {
        match self.index.peek() {
            None => IndexStatus::Building,
            Some(Ok(index)) => IndexStatus::Ready {
                indexed: index.len(),
            },
            Some(Err(e)) => IndexStatus::Failed(e.clone()),
        }
    }

    /// Run a query against the snapshot with whatever index is ready.
    pub fn query(&self, request: &RaceQuery) -> Vec<&Race> {
        let refs: Vec<&Race> = self.snapshot.iter().collect();
        let index = self.text_index();
        run_query(&refs, request, index.as_deref().map(|i| i as &dyn TextIndex))
    }
}

fn flatten_join(
    joined: std::result::Result<FuzzyIndex, tokio::task::JoinError>,
) -> IndexResult {
    joined
        .map(Arc::new)
        .map_err(|e| format!("index build task failed: {}", e))
}
