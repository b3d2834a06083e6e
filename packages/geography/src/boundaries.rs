//! County boundary geometry.
//!
//! Boundary sources deliver a `GeoJSON` `FeatureCollection` whose features
//! carry a `name` property (the county name) and an optional numeric
//! `code`. Features that are unusable are skipped with a warning and
//! reported back in [`BoundarySet::skipped`]; only a payload that is not
//! a feature collection at all is an error.

use feedback_map_geography_models::CountyCatalogEntry;
use feedback_map_geography_models::counties::KENYA_COUNTIES;
use geo::Geometry;
use geojson::GeoJson;
use serde_json::Value;

use crate::GeoError;

/// One county's drawable geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyBoundary {
    /// County name from the feature's `name` property.
    pub name: String,
    /// County code from the feature's `code` property.
    pub code: Option<u32>,
    /// Polygon, multipolygon, or representative point.
    pub geometry: Geometry<f64>,
}

/// A feature that could not be turned into a [`CountyBoundary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBoundary {
    /// Position of the feature in the source collection.
    pub index: usize,
    /// County name, when the feature had one.
    pub name: Option<String>,
    /// Why it was skipped.
    pub reason: String,
}

/// The usable boundaries of a feature collection plus what was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    /// Usable county features, in source order.
    pub counties: Vec<CountyBoundary>,
    /// Features that were skipped, in source order.
    pub skipped: Vec<SkippedBoundary>,
}

impl BoundarySet {
    /// Whether no drawable geometry is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counties.is_empty()
    }
}

/// Parses a `GeoJSON` feature collection of county boundaries.
///
/// # Errors
///
/// Returns [`GeoError`] if the input is not valid `GeoJSON` or is not a
/// `FeatureCollection`.
pub fn parse_boundaries(geojson_str: &str) -> Result<BoundarySet, GeoError> {
    let geojson: GeoJson = geojson_str.parse()?;
    from_geojson(geojson)
}

/// Converts an already-parsed `GeoJSON` document into a [`BoundarySet`].
///
/// # Errors
///
/// Returns [`GeoError::InvalidCollection`] if the document is not a
/// `FeatureCollection`.
pub fn from_geojson(geojson: GeoJson) -> Result<BoundarySet, GeoError> {
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeoError::InvalidCollection {
            message: "expected a FeatureCollection".to_string(),
        });
    };

    let mut set = BoundarySet::default();

    for (index, feature) in collection.features.into_iter().enumerate() {
        let name = feature
            .property("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let Some(name) = name else {
            log::warn!("Skipping boundary feature {index}: missing name property");
            set.skipped.push(SkippedBoundary {
                index,
                name: None,
                reason: "missing name property".to_string(),
            });
            continue;
        };

        let code = feature.property("code").and_then(parse_code);

        let Some(geometry) = feature.geometry else {
            log::warn!("Skipping boundary feature {index} ({name}): no geometry");
            set.skipped.push(SkippedBoundary {
                index,
                name: Some(name),
                reason: "no geometry".to_string(),
            });
            continue;
        };

        match Geometry::<f64>::try_from(geometry) {
            Ok(geometry) => set.counties.push(CountyBoundary {
                name,
                code,
                geometry,
            }),
            Err(e) => {
                log::warn!("Skipping boundary feature {index} ({name}): {e}");
                set.skipped.push(SkippedBoundary {
                    index,
                    name: Some(name),
                    reason: e.to_string(),
                });
            }
        }
    }

    log::debug!(
        "Parsed {} county boundaries ({} skipped)",
        set.counties.len(),
        set.skipped.len()
    );

    Ok(set)
}

/// Point geometry for every county in the built-in catalog.
///
/// Used when no boundary polygons are available: each county is drawn as
/// a marker at its catalog center.
#[must_use]
pub fn catalog_boundaries() -> BoundarySet {
    points_for(KENYA_COUNTIES)
}

/// Point geometry for the given catalog entries.
#[must_use]
pub fn points_for(catalog: &[CountyCatalogEntry]) -> BoundarySet {
    BoundarySet {
        counties: catalog
            .iter()
            .map(|entry| CountyBoundary {
                name: entry.name.to_string(),
                code: Some(u32::from(entry.code)),
                geometry: Geometry::Point(geo::Point::new(entry.longitude, entry.latitude)),
            })
            .collect(),
        skipped: Vec::new(),
    }
}

/// Accepts `"code": 47` as well as `"code": "047"`.
fn parse_code(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Nairobi", "code": 47 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[36.6, -1.45], [37.1, -1.45], [37.1, -1.1], [36.6, -1.1], [36.6, -1.45]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "code": "001" },
                "geometry": { "type": "Point", "coordinates": [39.66, -4.04] }
            },
            {
                "type": "Feature",
                "properties": { "name": "Lamu" },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "name": "Kisumu", "code": "042" },
                "geometry": { "type": "Point", "coordinates": [34.75, -0.1] }
            }
        ]
    }"#;

    #[test]
    fn keeps_named_features_and_reports_the_rest() {
        let set = parse_boundaries(SAMPLE).unwrap();

        let names: Vec<&str> = set.counties.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Nairobi", "Kisumu"]);
        assert_eq!(set.counties[0].code, Some(47));
        assert_eq!(set.counties[1].code, Some(42));
        assert!(matches!(set.counties[0].geometry, Geometry::Polygon(_)));

        assert_eq!(set.skipped.len(), 2);
        assert_eq!(set.skipped[0].index, 1);
        assert_eq!(set.skipped[0].name, None);
        assert_eq!(set.skipped[1].name.as_deref(), Some("Lamu"));
    }

    #[test]
    fn rejects_non_collection() {
        let err = parse_boundaries(r#"{"type": "Point", "coordinates": [36.8, -1.3]}"#)
            .unwrap_err();
        assert!(matches!(err, GeoError::InvalidCollection { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_boundaries("{not json").unwrap_err(),
            GeoError::GeoJson(_)
        ));
    }

    #[test]
    fn catalog_points_cover_every_county() {
        let set = catalog_boundaries();
        assert_eq!(set.counties.len(), KENYA_COUNTIES.len());
        let nairobi = set.counties.iter().find(|c| c.name == "Nairobi").unwrap();
        assert_eq!(
            nairobi.geometry,
            Geometry::Point(geo::Point::new(36.8172, -1.2864))
        );
    }
}
