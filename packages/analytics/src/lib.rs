#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feedback aggregation for the county choropleth and dashboard.
//!
//! All functions here are pure folds over a slice of
//! [`FeedbackRecord`](feedback_map_feedback_models::FeedbackRecord)s: they
//! never mutate their input, never fail, and rebuild their output from
//! scratch on every call.

pub mod aggregate;
pub mod color;
pub mod stats;

pub use aggregate::{aggregate_by_county, aggregate_with_catalog, issue_label};
pub use color::{NO_DATA_COLOR, color_for_count};
pub use stats::{compute_stats, compute_stats_at};
