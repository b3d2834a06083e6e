//! Per-county feedback aggregation.
//!
//! The join key is the county name already attached to each record's
//! location. Coordinates are never re-resolved here; records without a
//! county are counted as unresolved and left out of the per-county
//! totals.

use feedback_map_analytics_models::{CountyAggregate, CountyAggregation};
use feedback_map_feedback_models::FeedbackRecord;
use feedback_map_geography_models::counties::KENYA_COUNTIES;
use feedback_map_geography_models::{CountyCatalogEntry, county_key};

use crate::color::{NO_DATA_COLOR, color_for_count};

/// Issue label used when a record names no service.
pub const GENERAL_ISSUE: &str = "General";

/// The label a record contributes to its county's issue list.
#[must_use]
pub fn issue_label(record: &FeedbackRecord) -> &str {
    record
        .department
        .service_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(GENERAL_ISSUE)
}

/// Aggregates records over the built-in Kenya county catalog.
#[must_use]
pub fn aggregate_by_county(records: &[FeedbackRecord]) -> CountyAggregation {
    aggregate_with_catalog(records, KENYA_COUNTIES)
}

/// Aggregates records over `catalog`.
///
/// Every catalog county appears in the output, with a zero count if no
/// record names it. Records naming a county outside the catalog get an
/// entry of their own, displayed with the record's spelling.
#[must_use]
pub fn aggregate_with_catalog(
    records: &[FeedbackRecord],
    catalog: &[CountyCatalogEntry],
) -> CountyAggregation {
    let mut aggregation = CountyAggregation::default();

    for entry in catalog {
        aggregation
            .counties
            .insert(entry.key(), CountyAggregate::empty(entry.name, NO_DATA_COLOR));
    }

    for record in records {
        let Some(county) = record.county() else {
            aggregation.unresolved += 1;
            continue;
        };

        let key = county_key(county);
        let aggregate = aggregation.counties.entry(key).or_insert_with(|| {
            log::debug!("County {county:?} is not in the catalog; adding it");
            CountyAggregate::empty(county, NO_DATA_COLOR)
        });
        aggregate.record(issue_label(record));
    }

    aggregation.max_count = aggregation
        .counties
        .values()
        .map(|c| c.count)
        .max()
        .unwrap_or(0)
        .max(1);

    for aggregate in aggregation.counties.values_mut() {
        aggregate.color = color_for_count(aggregate.count, aggregation.max_count);
    }

    aggregation
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_map_feedback_models::{DepartmentSelection, GeoLocation};

    fn record(county: Option<&str>, service: Option<&str>) -> FeedbackRecord {
        FeedbackRecord {
            location: county.map(|c| GeoLocation {
                county: Some(c.to_string()),
                ..GeoLocation::default()
            }),
            department: DepartmentSelection {
                service_name: service.map(str::to_string),
                ..DepartmentSelection::default()
            },
            ..FeedbackRecord::default()
        }
    }

    #[test]
    fn counts_and_colors_by_county() {
        let records = vec![
            record(Some("Nairobi"), Some("passport")),
            record(Some("Nairobi"), Some("passport")),
            record(Some("Mombasa"), Some("water")),
        ];

        let result = aggregate_by_county(&records);

        let nairobi = result.get("Nairobi").unwrap();
        assert_eq!(nairobi.count, 2);
        assert_eq!(nairobi.issues, vec!["passport"]);
        assert_eq!(nairobi.color, color_for_count(2, 2));

        let mombasa = result.get("Mombasa").unwrap();
        assert_eq!(mombasa.count, 1);
        assert_eq!(mombasa.issues, vec!["water"]);
        assert_eq!(mombasa.color, color_for_count(1, 2));

        assert_eq!(result.max_count, 2);
        assert_eq!(result.get("Embu").unwrap().color, NO_DATA_COLOR);
    }

    #[test]
    fn empty_input_yields_zeroed_catalog() {
        let result = aggregate_by_county(&[]);
        assert_eq!(result.counties.len(), KENYA_COUNTIES.len());
        assert_eq!(result.max_count, 1);
        for aggregate in result.counties.values() {
            assert_eq!(aggregate.count, 0);
            assert!(aggregate.issues.is_empty());
            assert_eq!(aggregate.color, NO_DATA_COLOR);
        }
    }

    #[test]
    fn sum_of_counts_equals_records_with_a_county() {
        let records = vec![
            record(Some("Kisumu"), None),
            record(None, Some("water")),
            record(Some("kisumu"), Some("roads")),
            record(Some("Atlantis"), None),
            record(Some("  "), None),
            record(Some("Nakuru"), Some("roads")),
        ];

        let result = aggregate_by_county(&records);
        assert_eq!(result.attributed(), 4);
        assert_eq!(result.unresolved, 2);
    }

    #[test]
    fn lookups_ignore_case_and_unknown_counties_are_added() {
        let records = vec![
            record(Some("NAIROBI"), None),
            record(Some("Atlantis"), Some("ferries")),
        ];

        let result = aggregate_by_county(&records);
        let nairobi = result.get("nairobi").unwrap();
        assert_eq!(nairobi.name, "Nairobi");
        assert_eq!(nairobi.issues, vec![GENERAL_ISSUE]);

        let atlantis = result.get("atlantis").unwrap();
        assert_eq!(atlantis.name, "Atlantis");
        assert_eq!(atlantis.count, 1);
        assert_eq!(result.counties.len(), KENYA_COUNTIES.len() + 1);
    }

    #[test]
    fn issues_are_distinct_per_county() {
        let records = vec![
            record(Some("Meru"), Some("water")),
            record(Some("Meru"), Some("roads")),
            record(Some("Meru"), Some("water")),
            record(Some("Meru"), Some("")),
            record(Some("Meru"), None),
        ];
        let meru = aggregate_by_county(&records).get("Meru").cloned().unwrap();
        assert_eq!(meru.count, 5);
        assert_eq!(meru.issues, vec!["water", "roads", GENERAL_ISSUE]);
    }

    #[test]
    fn rerunning_gives_equal_output_and_leaves_input_alone() {
        let records = vec![
            record(Some("Kiambu"), Some("billing")),
            record(Some("Kajiado"), None),
        ];
        let before = records.clone();
        let first = aggregate_by_county(&records);
        let second = aggregate_by_county(&records);
        assert_eq!(first, second);
        assert_eq!(records, before);
    }

    #[test]
    fn custom_catalog_is_respected() {
        let catalog = [CountyCatalogEntry {
            name: "Alpha",
            code: 1,
            latitude: 1.0,
            longitude: 1.0,
        }];
        let result = aggregate_with_catalog(&[record(Some("alpha"), None)], &catalog);
        assert_eq!(result.counties.len(), 1);
        assert_eq!(result.get("Alpha").unwrap().count, 1);
    }
}
