//! County boundary geometry sources.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use feedback_map_geography::boundaries::{BoundarySet, catalog_boundaries, parse_boundaries};

use crate::SourceError;
use crate::config::BoundarySourceConfig;
use crate::http;

/// Something that can produce county boundary geometry.
#[async_trait]
pub trait BoundarySource: Send + Sync {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Loads the boundaries.
    ///
    /// Individual features that are malformed are skipped and listed in
    /// [`BoundarySet::skipped`]; only a failure to obtain or parse the
    /// collection as a whole is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the data cannot be fetched or is not a
    /// GeoJSON `FeatureCollection`.
    async fn load(&self) -> Result<BoundarySet, SourceError>;
}

/// Point markers at the built-in county centers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogBoundaries;

#[async_trait]
impl BoundarySource for CatalogBoundaries {
    fn describe(&self) -> String {
        "built-in county centers".to_string()
    }

    async fn load(&self) -> Result<BoundarySet, SourceError> {
        Ok(catalog_boundaries())
    }
}

/// A GeoJSON file on disk.
#[derive(Debug, Clone)]
pub struct FileBoundaries {
    path: PathBuf,
}

impl FileBoundaries {
    /// Reads the collection at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BoundarySource for FileBoundaries {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn load(&self) -> Result<BoundarySet, SourceError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        finish(&self.describe(), &text)
    }
}

/// A GeoJSON document served over HTTP.
#[derive(Debug, Clone)]
pub struct UrlBoundaries {
    client: reqwest::Client,
    url: String,
    retries: u32,
}

impl UrlBoundaries {
    /// Fetches `url` once per load.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            retries: 0,
        }
    }

    /// Retries transient failures up to `retries` times per load.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

#[async_trait]
impl BoundarySource for UrlBoundaries {
    fn describe(&self) -> String {
        format!("url {}", self.url)
    }

    async fn load(&self) -> Result<BoundarySet, SourceError> {
        let text = http::fetch_text(&self.client, &self.url, self.retries).await?;
        finish(&self.describe(), &text)
    }
}

fn finish(source: &str, text: &str) -> Result<BoundarySet, SourceError> {
    let set = parse_boundaries(text)?;
    log::info!(
        "Loaded {} county boundaries from {source} ({} skipped)",
        set.counties.len(),
        set.skipped.len()
    );
    Ok(set)
}

/// Builds the source described by `config`.
///
/// # Errors
///
/// * If an HTTP client is needed and cannot be built
pub fn from_config(config: &BoundarySourceConfig) -> Result<Arc<dyn BoundarySource>, SourceError> {
    Ok(match config {
        BoundarySourceConfig::Catalog => Arc::new(CatalogBoundaries),
        BoundarySourceConfig::File { path } => Arc::new(FileBoundaries::new(path.clone())),
        BoundarySourceConfig::Url { url, retries } => {
            Arc::new(UrlBoundaries::new(http::client()?, url).with_retries(*retries))
        }
    })
}
