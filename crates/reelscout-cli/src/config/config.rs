//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reelscout_core::{DEFAULT_AGE_BATCH_SIZE, QueryOptions, SortOrder};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB request settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search page defaults.
    #[serde(default)]
    pub search: SearchConfig,
}

/// TMDB request settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// Response language (e.g. "en-US", "ja-JP").
    #[serde(default = "default_language")]
    pub language: String,
    /// Include adult titles and profiles in searches.
    #[serde(default)]
    pub include_adult: bool,
    /// Minimum interval between requests in milliseconds.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// API base URL override (e.g. a local mock server).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            include_adult: false,
            min_interval_ms: default_min_interval_ms(),
            base_url: None,
        }
    }
}

impl TmdbConfig {
    /// Minimum request interval as a `Duration`.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Options applied to every cached query.
    #[must_use]
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            language: self.language.clone(),
            include_adult: self.include_adult,
        }
    }
}

/// Search page defaults.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Person detail requests in flight per age batch.
    #[serde(default = "default_age_batch_size")]
    pub age_batch_size: usize,
    /// Sort direction when none is given ("asc" or "desc").
    #[serde(default = "default_sort_order")]
    pub default_sort_order: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            age_batch_size: default_age_batch_size(),
            default_sort_order: default_sort_order(),
        }
    }
}

impl SearchConfig {
    /// Parsed default sort direction.
    ///
    /// # Errors
    ///
    /// Returns an error if `default_sort_order` is neither "asc" nor "desc".
    pub fn sort_order(&self) -> Result<SortOrder> {
        self.default_sort_order
            .parse()
            .context("invalid search.default_sort_order in config")
    }
}

fn default_language() -> String {
    String::from("en-US")
}

const fn default_min_interval_ms() -> u64 {
    25
}

const fn default_age_batch_size() -> usize {
    DEFAULT_AGE_BATCH_SIZE
}

fn default_sort_order() -> String {
    String::from(SortOrder::Asc.as_str())
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
