#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for feedback aggregation.
//!
//! Everything here is derived data: recomputed from raw feedback records
//! on every aggregation run and never persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use feedback_map_geography_models::county_key;
use serde::{Deserialize, Serialize};

/// A color in HSL space.
///
/// Hue is in degrees `[0, 360)`, saturation and lightness in percent
/// `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HslColor {
    /// Hue in degrees.
    pub hue: f64,
    /// Saturation in percent.
    pub saturation: f64,
    /// Lightness in percent.
    pub lightness: f64,
}

impl HslColor {
    /// Creates a color from its components.
    #[must_use]
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Converts to 8-bit RGB.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::many_single_char_names
    )]
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);
        let h = self.hue.rem_euclid(360.0) / 60.0;

        let c = (1.0 - 2.0f64.mul_add(l, -1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h {
            h if h < 1.0 => (c, x, 0.0),
            h if h < 2.0 => (x, c, 0.0),
            h if h < 3.0 => (0.0, c, x),
            h if h < 4.0 => (0.0, x, c),
            h if h < 5.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;

        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(r), channel(g), channel(b))
    }

    /// Formats as a `#rrggbb` hex string.
    #[must_use]
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl std::fmt::Display for HslColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            round2(self.hue),
            round2(self.saturation),
            round2(self.lightness)
        )
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-county feedback summary for one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyAggregate {
    /// Display name (catalog spelling, or the raw name for unknown counties).
    pub name: String,
    /// Number of records attributed to this county.
    pub count: u64,
    /// Distinct issue labels, in first-seen order.
    pub issues: Vec<String>,
    /// Fill color, relative to the run's maximum count.
    pub color: HslColor,
}

impl CountyAggregate {
    /// Creates an aggregate with no records.
    #[must_use]
    pub fn empty(name: impl Into<String>, color: HslColor) -> Self {
        Self {
            name: name.into(),
            count: 0,
            issues: Vec::new(),
            color,
        }
    }

    /// Records one more submission with the given issue label.
    ///
    /// The label is only added if it has not been seen for this county.
    pub fn record(&mut self, issue: &str) {
        self.count += 1;
        if !self.issues.iter().any(|i| i == issue) {
            self.issues.push(issue.to_string());
        }
    }
}

/// Output of a county aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyAggregation {
    /// Aggregates keyed by lower-cased county name.
    pub counties: BTreeMap<String, CountyAggregate>,
    /// Largest count across all counties, floored at 1.
    pub max_count: u64,
    /// Records that carried no county and were not attributed.
    pub unresolved: u64,
}

impl CountyAggregation {
    /// Looks up a county by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CountyAggregate> {
        self.counties.get(&county_key(name))
    }

    /// Sum of all county counts.
    #[must_use]
    pub fn attributed(&self) -> u64 {
        self.counties.values().map(|c| c.count).sum()
    }

    /// Aggregates ordered by count (highest first), then by name.
    #[must_use]
    pub fn ranked(&self) -> Vec<&CountyAggregate> {
        let mut ranked: Vec<&CountyAggregate> = self.counties.values().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        ranked
    }
}

/// Dashboard summary counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    /// Number of records.
    pub total: u64,
    /// Records per county name (`"Unknown"` for records without one).
    pub by_county: BTreeMap<String, u64>,
    /// Records per department display name (`"Unknown"` when missing).
    pub by_department: BTreeMap<String, u64>,
    /// Records per status.
    pub by_status: BTreeMap<String, u64>,
    /// Records per submission type.
    pub by_type: BTreeMap<String, u64>,
    /// When these numbers were computed.
    pub last_updated: DateTime<Utc>,
}
