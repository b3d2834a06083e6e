//! The 47 counties of Kenya.
//!
//! Center coordinates are approximate and only suitable for
//! nearest-neighbor attribution, not for drawing boundaries.

use crate::{CountyCatalogEntry, county_key};

macro_rules! county {
    ($code:literal, $name:literal, $lat:literal, $lng:literal) => {
        CountyCatalogEntry {
            name: $name,
            code: $code,
            latitude: $lat,
            longitude: $lng,
        }
    };
}

/// All counties, ordered by official county code.
pub const KENYA_COUNTIES: &[CountyCatalogEntry] = &[
    county!(1, "Mombasa", -4.0435, 39.6682),
    county!(2, "Kwale", -4.1816, 39.4606),
    county!(3, "Kilifi", -3.5107, 39.9093),
    county!(4, "Tana River", -1.6519, 39.6516),
    county!(5, "Lamu", -2.2696, 40.9006),
    county!(6, "Taita Taveta", -3.3167, 38.3667),
    county!(7, "Garissa", -0.4532, 39.6461),
    county!(8, "Wajir", 1.7488, 40.0586),
    county!(9, "Mandera", 3.9366, 41.8675),
    county!(10, "Marsabit", 2.3284, 37.9899),
    county!(11, "Isiolo", 0.3557, 37.5833),
    county!(12, "Meru", 0.0515, 37.6456),
    county!(13, "Tharaka-Nithi", -0.2961, 37.7231),
    county!(14, "Embu", -0.5301, 37.4500),
    county!(15, "Kitui", -1.3667, 38.0167),
    county!(16, "Machakos", -1.5221, 37.2632),
    county!(17, "Makueni", -2.2783, 37.8282),
    county!(18, "Nyandarua", -0.5323, 36.4275),
    county!(19, "Nyeri", -0.4167, 36.9500),
    county!(20, "Kirinyaga", -0.4998, 37.2803),
    county!(21, "Murang'a", -0.7200, 37.1500),
    county!(22, "Kiambu", -1.0333, 37.0833),
    county!(23, "Turkana", 3.1201, 35.6000),
    county!(24, "West Pokot", 1.2500, 35.1000),
    county!(25, "Samburu", 1.1167, 36.6833),
    county!(26, "Trans Nzoia", 1.0500, 34.9500),
    county!(27, "Uasin Gishu", 0.5167, 35.2833),
    county!(28, "Elgeyo-Marakwet", 0.5000, 35.6500),
    county!(29, "Nandi", 0.1833, 35.1500),
    county!(30, "Baringo", 0.4667, 35.9500),
    county!(31, "Laikipia", 0.2000, 36.3667),
    county!(32, "Nakuru", -0.3000, 36.0667),
    county!(33, "Narok", -1.0833, 35.8667),
    county!(34, "Kajiado", -1.8500, 36.7833),
    county!(35, "Kericho", -0.3667, 35.2833),
    county!(36, "Bomet", -0.7833, 35.3333),
    county!(37, "Kakamega", 0.2833, 34.7500),
    county!(38, "Vihiga", 0.0500, 34.7167),
    county!(39, "Bungoma", 0.5667, 34.5667),
    county!(40, "Busia", 0.4500, 34.1167),
    county!(41, "Siaya", 0.0667, 34.2833),
    county!(42, "Kisumu", -0.1000, 34.7500),
    county!(43, "Homa Bay", -0.5333, 34.4500),
    county!(44, "Migori", -1.0667, 34.4667),
    county!(45, "Kisii", -0.6833, 34.7667),
    county!(46, "Nyamira", -0.5667, 34.9333),
    county!(47, "Nairobi", -1.2864, 36.8172),
];

/// Looks up a county by name, ignoring case and surrounding whitespace.
#[must_use]
pub fn county_by_name(name: &str) -> Option<&'static CountyCatalogEntry> {
    let key = county_key(name);
    KENYA_COUNTIES.iter().find(|c| county_key(c.name) == key)
}

/// Looks up a county by its official code.
#[must_use]
pub fn county_by_code(code: u8) -> Option<&'static CountyCatalogEntry> {
    KENYA_COUNTIES.iter().find(|c| c.code == code)
}
