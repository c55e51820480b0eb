//! Configuration loading.
//!
//! Settings come from a TOML file, looked up in this order:
//! 1. the path in `RACE_FINDER_CONFIG`
//! 2. `<config dir>/race-finder/config.toml` (e.g. `~/.config/race-finder/config.toml`)
//! 3. built-in defaults
//!
//! `RACE_FINDER_DATASET` overrides the dataset path from any source.

use crate::error::ConfigError;
use crate::search::{Field, FuzzySettings};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RACE_FINDER_CONFIG";

/// Environment variable overriding the dataset path.
pub const DATASET_ENV: &str = "RACE_FINDER_DATASET";

const DEFAULT_DATASET: &str = "races.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the bundled race JSON file.
    pub dataset: PathBuf,
    /// Default log level when `RUST_LOG` is unset.
    pub log_level: String,
    pub fuzzy: FuzzyConfig,
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            log_level: "info".to_string(),
            fuzzy: FuzzyConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    pub threshold: f64,
    pub limit: usize,
    pub name_weight: f64,
    pub nick_name_weight: f64,
    pub location_weight: f64,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        let defaults = FuzzySettings::default();
        let weight = |field: Field| {
            defaults
                .keys
                .iter()
                .find(|(f, _)| *f == field)
                .map_or(0.0, |(_, w)| *w)
        };
        Self {
            threshold: defaults.threshold,
            limit: defaults.limit,
            name_weight: weight(Field::Name),
            nick_name_weight: weight(Field::NickName),
            location_weight: weight(Field::Location),
        }
    }
}

impl FuzzyConfig {
    /// Convert to index settings, clamping out-of-range values.
    pub fn to_settings(&self) -> FuzzySettings {
        let defaults = FuzzySettings::default();

        let threshold = if (0.0..=1.0).contains(&self.threshold) {
            self.threshold
        } else {
            tracing::warn!(
                "fuzzy.threshold {} is outside 0..=1, using {}",
                self.threshold,
                defaults.threshold
            );
            defaults.threshold
        };

        let limit = if self.limit == 0 {
            tracing::warn!("fuzzy.limit must be positive, using {}", defaults.limit);
            defaults.limit
        } else {
            self.limit
        };

        let keys = [
            (Field::Name, self.name_weight),
            (Field::NickName, self.nick_name_weight),
            (Field::Location, self.location_weight),
        ]
        .into_iter()
        .filter(|(_, weight)| weight.is_finite() && *weight > 0.0)
        .collect();

        FuzzySettings {
            keys,
            threshold,
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results a tool call returns when it doesn't ask for a limit.
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 20 }
    }
}

impl Config {
    /// Parse a config file from TOML text.
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.dataset = PathBuf::from(expand_tilde(&config.dataset.to_string_lossy()).as_ref());
        Ok(config)
    }

    /// Load a config file from disk.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &content)
    }

    /// Resolve configuration from the environment and the default location.
    pub fn discover() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let default_path = dirs::config_dir().map(|dir| dir.join("race-finder/config.toml"));

        let mut config = match (explicit, default_path) {
            (Some(path), _) => Self::load_from(&PathBuf::from(
                expand_tilde(&path.to_string_lossy()).as_ref(),
            ))?,
            (None, Some(path)) if path.is_file() => Self::load_from(&path)?,
            _ => Self::default(),
        };

        if let Some(dataset) = std::env::var_os(DATASET_ENV) {
            config.dataset = PathBuf::from(expand_tilde(&dataset.to_string_lossy()).as_ref());
        }

        Ok(config)
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
///
/// Returns `Cow::Borrowed` if no expansion needed, `Cow::Owned` if expanded.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
