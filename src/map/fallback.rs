//! Offline city-centre table used when coordinates cannot be generated.

use crate::types::{GeoPoint, PointKind};

const CITY_CENTERS: &[(&str, f64, f64)] = &[
    ("delhi", 28.6139, 77.2090),
    ("mumbai", 19.0760, 72.8777),
    ("mathura", 27.4924, 77.6737),
    ("lucknow", 26.8467, 80.9462),
    ("paris", 48.8566, 2.3522),
    ("tokyo", 35.6762, 139.6503),
    ("new york", 40.7128, -74.0060),
    ("london", 51.5074, -0.1278),
];

/// Used for any city missing from the table.
pub const DEFAULT_CENTER: (f64, f64) = (28.6139, 77.2090);

/// Known centre for `city`, if the table has it
pub fn lookup_city_center(city: &str) -> Option<(f64, f64)> {
    let key = city.trim().to_lowercase();
    CITY_CENTERS
        .iter()
        .find(|(name, _, _)| *name == key)
        .map(|(_, latitude, longitude)| (*latitude, *longitude))
}

pub fn city_center_or_default(city: &str) -> (f64, f64) {
    lookup_city_center(city).unwrap_or(DEFAULT_CENTER)
}

/// Single destination marker placed on the static-table map.
pub fn destination_marker(city: &str) -> GeoPoint {
    let (latitude, longitude) = city_center_or_default(city);
    let title = title_case(city);
    GeoPoint::new(
        format!("{} - Your Destination", title),
        latitude,
        longitude,
        PointKind::Destination,
    )
    .with_tooltip(format!("Welcome to {}!", title))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
