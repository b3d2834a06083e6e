#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County choropleth rendering.
//!
//! Takes county boundary geometry plus a
//! [`CountyAggregation`](feedback_map_analytics_models::CountyAggregation)
//! and produces a self-contained SVG document. The draw pass is a pure
//! function of its inputs and is re-run in full whenever data, viewport,
//! or zoom changes.
//!
//! * [`projection`] fits a Mercator projection to the geometry extent.
//! * [`path`] turns projected geometry into SVG shapes.
//! * [`view`] is the bounded zoom/pan transform.
//! * [`interaction`] tracks hover, tooltip, and selection state.
//! * [`state`] is the `loading -> ready | error` load state machine.
//! * [`svg`] assembles the document.

pub mod interaction;
pub mod path;
pub mod projection;
pub mod state;
pub mod svg;
pub mod view;

use thiserror::Error;

pub use svg::{RenderOptions, RenderedMap, render_load_state, render_map, render_status};

/// Errors that can occur while rendering.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// The drawing surface has no usable area.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// There is no finite coordinate to fit a projection to.
    #[error("Geometry has no finite extent")]
    EmptyExtent,
}

/// Why a single feature was left off the map.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// Geometry kind the renderer does not draw (lines, collections).
    #[error("unsupported geometry type {0}")]
    UnsupportedGeometry(&'static str),

    /// A coordinate was not finite or fell outside the projection's domain.
    #[error("coordinate ({x}, {y}) cannot be projected")]
    InvalidCoordinate {
        /// Longitude as given.
        x: f64,
        /// Latitude as given.
        y: f64,
    },

    /// The geometry has no coordinates.
    #[error("geometry is empty")]
    Empty,
}

/// A county that was skipped during a draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFeature {
    /// County name.
    pub name: String,
    /// What went wrong.
    pub error: ProjectionError,
}
