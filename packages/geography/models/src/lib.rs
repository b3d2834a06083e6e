#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County catalog and geographic reference types.
//!
//! Counties are the unit feedback is aggregated by. The catalog is static
//! reference data: it is compiled in, never mutated, and its order is
//! significant (it breaks ties in nearest-county resolution).

pub mod counties;

use serde::Serialize;

/// A county with its approximate center coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyCatalogEntry {
    /// County name (unique within the catalog).
    pub name: &'static str,
    /// Official county code (1-47).
    pub code: u8,
    /// Center latitude in degrees.
    pub latitude: f64,
    /// Center longitude in degrees.
    pub longitude: f64,
}

impl CountyCatalogEntry {
    /// Lower-cased name, used as the case-insensitive join key.
    #[must_use]
    pub fn key(&self) -> String {
        county_key(self.name)
    }
}

/// Normalizes a county name into a lookup key.
///
/// Keys are trimmed and lower-cased so that `"Nairobi"`, `"nairobi"` and
/// `" NAIROBI "` all refer to the same county.
#[must_use]
pub fn county_key(name: &str) -> String {
    name.trim().to_lowercase()
}
