#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the feedback map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the aggregation types to allow independent evolution of the API
//! contract.

use feedback_map_analytics_models::{CountyAggregate, CountyAggregation};
use feedback_map_geography_models::CountyCatalogEntry;
use serde::{Deserialize, Serialize};

/// Server health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// One county's feedback summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCounty {
    /// County display name.
    pub name: String,
    /// Number of feedback records.
    pub count: u64,
    /// Distinct issue labels.
    pub issues: Vec<String>,
    /// Fill color as `#rrggbb`.
    pub color: String,
    /// Fill color as a CSS `hsl()` value.
    pub hsl: String,
}

impl From<&CountyAggregate> for ApiCounty {
    fn from(aggregate: &CountyAggregate) -> Self {
        Self {
            name: aggregate.name.clone(),
            count: aggregate.count,
            issues: aggregate.issues.clone(),
            color: aggregate.color.to_hex(),
            hsl: aggregate.color.to_string(),
        }
    }
}

/// Response for `GET /api/counties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountyList {
    /// Counties, busiest first.
    pub counties: Vec<ApiCounty>,
    /// Largest county count (at least 1).
    pub max_count: u64,
    /// Records with no county.
    pub unresolved: u64,
}

impl From<&CountyAggregation> for ApiCountyList {
    fn from(aggregation: &CountyAggregation) -> Self {
        Self {
            counties: aggregation.ranked().into_iter().map(ApiCounty::from).collect(),
            max_count: aggregation.max_count,
            unresolved: aggregation.unresolved,
        }
    }
}

/// Query parameters for the resolve endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveParams {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// Response for `GET /api/resolve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResolvedCounty {
    /// Nearest county, or `None` for unusable coordinates.
    pub county: Option<String>,
    /// Catalog code of that county.
    pub code: Option<u8>,
}

impl From<Option<&CountyCatalogEntry>> for ApiResolvedCounty {
    fn from(entry: Option<&CountyCatalogEntry>) -> Self {
        Self {
            county: entry.map(|e| e.name.to_string()),
            code: entry.map(|e| e.code),
        }
    }
}

/// Query parameters for the department search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Search text.
    #[serde(default)]
    pub q: String,
}

/// Query parameters for the map endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapQueryParams {
    /// Drawing width (default 800).
    pub width: Option<f64>,
    /// Drawing height (default 600).
    pub height: Option<f64>,
    /// County to highlight as selected.
    pub selected: Option<String>,
    /// County to draw as hovered, with its tooltip.
    pub hovered: Option<String>,
    /// Zoom factor, clamped to 1-8.
    pub zoom: Option<f64>,
    /// Horizontal pan.
    pub x: Option<f64>,
    /// Vertical pan.
    pub y: Option<f64>,
}
