//! Data source configuration.
//!
//! Read from a TOML file:
//!
//! ```toml
//! seed_mock_data = true
//!
//! [mock_delay_ms]
//! list = 500
//! create = 800
//! stats = 300
//!
//! [boundaries]
//! type = "file"
//! path = "data/kenya_counties.geojson"
//! ```
//!
//! A `type = "url"` source takes `url` and an optional `retries` count
//! (default 0).
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::SourceError;

/// Top-level data source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Simulated latency of the in-memory feedback store.
    pub mock_delay_ms: MockDelays,
    /// Where county geometry comes from.
    pub boundaries: BoundarySourceConfig,
    /// Start the in-memory store with sample records.
    pub seed_mock_data: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mock_delay_ms: MockDelays::default(),
            boundaries: BoundarySourceConfig::default(),
            seed_mock_data: true,
        }
    }
}

impl SourceConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// * If the document is not valid TOML or has unexpected value types
    pub fn from_toml_str(toml_str: &str) -> Result<Self, SourceError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read
    /// * If the file is not a valid configuration
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        log::info!("Loading source config from {}", path.display());
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

/// Per-operation latency, in milliseconds, of the in-memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MockDelays {
    /// Delay before `list` answers.
    pub list: u64,
    /// Delay before `create` answers.
    pub create: u64,
    /// Delay before `stats` answers.
    pub stats: u64,
}

impl Default for MockDelays {
    fn default() -> Self {
        Self {
            list: 500,
            create: 800,
            stats: 300,
        }
    }
}

impl MockDelays {
    /// No simulated latency.
    pub const NONE: Self = Self {
        list: 0,
        create: 0,
        stats: 0,
    };

    /// Delay before `list` answers.
    #[must_use]
    pub const fn list(&self) -> Duration {
        Duration::from_millis(self.list)
    }

    /// Delay before `create` answers.
    #[must_use]
    pub const fn create(&self) -> Duration {
        Duration::from_millis(self.create)
    }

    /// Delay before `stats` answers.
    #[must_use]
    pub const fn stats(&self) -> Duration {
        Duration::from_millis(self.stats)
    }
}

/// Where county boundary geometry is loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundarySourceConfig {
    /// Point markers at the built-in county centers.
    #[default]
    Catalog,
    /// A GeoJSON `FeatureCollection` on disk.
    File {
        /// Path to the file.
        path: PathBuf,
    },
    /// A GeoJSON `FeatureCollection` fetched over HTTP.
    Url {
        /// Address to fetch.
        url: String,
        /// Automatic retries of transient failures. Off by default; a
        /// failed load waits for the user to retry.
        #[serde(default)]
        retries: u32,
    },
}
