//! Dashboard summary statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use feedback_map_analytics_models::FeedbackStats;
use feedback_map_feedback_models::FeedbackRecord;

/// Bucket for records missing the grouping field.
pub const UNKNOWN: &str = "Unknown";

/// Groups records by county, department, status, and type, stamped with
/// the current time.
#[must_use]
pub fn compute_stats(records: &[FeedbackRecord]) -> FeedbackStats {
    compute_stats_at(records, Utc::now())
}

/// Like [`compute_stats`] with an explicit generation timestamp.
#[must_use]
pub fn compute_stats_at(records: &[FeedbackRecord], now: DateTime<Utc>) -> FeedbackStats {
    let mut by_county = BTreeMap::new();
    let mut by_department = BTreeMap::new();
    let mut by_status = BTreeMap::new();
    let mut by_type = BTreeMap::new();

    for record in records {
        let county = record.county().unwrap_or(UNKNOWN);
        *by_county.entry(county.to_string()).or_insert(0) += 1;

        let department = record
            .department
            .department_name
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN);
        *by_department.entry(department.to_string()).or_insert(0) += 1;

        *by_status.entry(record.status.to_string()).or_insert(0) += 1;
        *by_type.entry(record.feedback_type.to_string()).or_insert(0) += 1;
    }

    FeedbackStats {
        total: records.len() as u64,
        by_county,
        by_department,
        by_status,
        by_type,
        last_updated: now,
    }
}
