#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County attribution and boundary geometry.
//!
//! [`resolver`] maps raw coordinates onto the static county catalog by
//! nearest center point. [`boundaries`] parses county boundary
//! `GeoJSON` into `geo` geometries for the map renderer, skipping (and
//! reporting) features it cannot use instead of failing the whole load.

pub mod boundaries;
pub mod resolver;

use thiserror::Error;

/// Errors that can occur while loading county geometry.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The payload is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The payload is valid `GeoJSON` but not a usable feature collection.
    #[error("Invalid feature collection: {message}")]
    InvalidCollection {
        /// Description of what went wrong.
        message: String,
    },
}
