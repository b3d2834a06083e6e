#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Where map data comes from.
//!
//! Feedback records are served by a [`FeedbackRepository`]; county
//! geometry by a [`BoundarySource`]. The [`loader::MapDataLoader`] fetches
//! both, aggregates the records, and tracks the result through the
//! `loading -> ready | error` state machine.

pub mod boundaries;
pub mod config;
pub mod http;
pub mod loader;
pub mod mock;
pub mod repository;

pub use boundaries::BoundarySource;
pub use repository::FeedbackRepository;

use feedback_map_feedback_models::ValidationError;
use feedback_map_geography::GeoError;

/// Errors that can occur while fetching or storing map data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Boundary geometry was malformed.
    #[error("Boundary data error: {0}")]
    Geo(#[from] GeoError),

    /// A submission was rejected.
    #[error("Invalid submission: {0}")]
    Validation(#[from] ValidationError),
}
