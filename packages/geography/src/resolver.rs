//! Nearest-county resolution.
//!
//! Attribution uses squared Euclidean distance in degree space against
//! each county's center point. This ignores projection distortion, which
//! is acceptable at county scale near the equator. The catalog is small
//! so a linear scan is used; the first minimum in catalog order wins.

use feedback_map_feedback_models::GeoLocation;
use feedback_map_geography_models::CountyCatalogEntry;
use feedback_map_geography_models::counties::KENYA_COUNTIES;

/// Resolves coordinates against a county catalog.
#[derive(Debug, Clone, Copy)]
pub struct CountyResolver<'a> {
    catalog: &'a [CountyCatalogEntry],
}

impl Default for CountyResolver<'static> {
    fn default() -> Self {
        Self::new(KENYA_COUNTIES)
    }
}

impl<'a> CountyResolver<'a> {
    /// Creates a resolver over `catalog`.
    #[must_use]
    pub const fn new(catalog: &'a [CountyCatalogEntry]) -> Self {
        Self { catalog }
    }

    /// Returns the catalog entry whose center is closest to the point.
    ///
    /// Returns `None` for degenerate input: a non-finite or exactly zero
    /// latitude or longitude means "no location", as does an empty
    /// catalog.
    #[must_use]
    pub fn nearest(&self, lat: f64, lng: f64) -> Option<&'a CountyCatalogEntry> {
        if !is_usable_coordinate(lat) || !is_usable_coordinate(lng) {
            return None;
        }

        let mut best: Option<(&'a CountyCatalogEntry, f64)> = None;
        for entry in self.catalog {
            let d_lat = entry.latitude - lat;
            let d_lng = entry.longitude - lng;
            let distance = d_lat.mul_add(d_lat, d_lng * d_lng);

            match best {
                Some((_, min)) if distance >= min => {}
                _ => best = Some((entry, distance)),
            }
        }

        best.map(|(entry, _)| entry)
    }

    /// Returns the name of the nearest county.
    #[must_use]
    pub fn resolve(&self, lat: f64, lng: f64) -> Option<&'a str> {
        self.nearest(lat, lng).map(|entry| entry.name)
    }

    /// Fills in `location.county` from its coordinates if it is not
    /// already set.
    ///
    /// Returns the county the location ends up attributed to.
    pub fn attach(&self, location: &mut GeoLocation) -> Option<String> {
        if let Some(existing) = location.county() {
            return Some(existing.to_string());
        }

        let resolved = self.resolve(location.latitude, location.longitude);
        if resolved.is_none() {
            log::debug!(
                "No county for coordinates ({}, {})",
                location.latitude,
                location.longitude
            );
        }
        location.county = resolved.map(str::to_string);
        location.county.clone()
    }
}

/// Resolves coordinates against the built-in Kenya county catalog.
#[must_use]
pub fn resolve_county(lat: f64, lng: f64) -> Option<&'static str> {
    CountyResolver::default().resolve(lat, lng)
}

fn is_usable_coordinate(value: f64) -> bool {
    value.is_finite() && value != 0.0
}
