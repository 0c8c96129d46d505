use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{
    lenient::{self, unavailable},
    response::ResponseShape,
};

/// A named, typed point on the itinerary map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub kind: PointKind,
    /// Hover text; the marker shows `name` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl GeoPoint {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, kind: PointKind) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            kind,
            tooltip: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

/// True when the pair is a finite WGS84 coordinate.
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PointKind {
    Restaurant,
    #[default]
    Attraction,
    Hotel,
    Shopping,
    Transport,
    /// The trip's destination itself, placed from the city-centre table
    Destination,
    /// Any type label outside the known set
    Other(String),
}

impl PointKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "restaurant" => PointKind::Restaurant,
            "attraction" => PointKind::Attraction,
            "hotel" => PointKind::Hotel,
            "shopping" => PointKind::Shopping,
            "transport" => PointKind::Transport,
            "destination" => PointKind::Destination,
            _ => PointKind::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PointKind::Restaurant => "restaurant",
            PointKind::Attraction => "attraction",
            PointKind::Hotel => "hotel",
            PointKind::Shopping => "shopping",
            PointKind::Transport => "transport",
            PointKind::Destination => "destination",
            PointKind::Other(raw) => raw,
        }
    }
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PointKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PointKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(lenient::value_to_text(&value)
            .map(|text| PointKind::parse(&text))
            .unwrap_or_default())
    }
}

/// Response of the coordinate-generation call.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationsPayload {
    #[serde(default, deserialize_with = "lenient::list")]
    locations: Vec<RawLocation>,
    #[serde(default, deserialize_with = "lenient::optional")]
    city_center: Option<Coordinates>,
}

impl ResponseShape for LocationsPayload {
    const NAME: &'static str = "map locations";
}

#[derive(Debug, Clone, Deserialize)]
struct RawLocation {
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    longitude: Option<f64>,
    #[serde(default, rename = "type")]
    kind: PointKind,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Coordinates {
    #[serde(default, deserialize_with = "lenient::number")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    longitude: Option<f64>,
}

impl Coordinates {
    fn resolve(self) -> Option<(f64, f64)> {
        let (latitude, longitude) = (self.latitude?, self.longitude?);
        is_valid_coordinate(latitude, longitude).then_some((latitude, longitude))
    }
}

impl LocationsPayload {
    /// Points with usable coordinates, in response order
    pub fn points(&self) -> Vec<GeoPoint> {
        self.locations
            .iter()
            .filter_map(|location| {
                let coordinates = Coordinates {
                    latitude: location.latitude,
                    longitude: location.longitude,
                };
                let (latitude, longitude) = coordinates.resolve()?;
                Some(GeoPoint::new(
                    location.name.clone(),
                    latitude,
                    longitude,
                    location.kind.clone(),
                ))
            })
            .collect()
    }

    /// City centre reported by the service, when it gave a valid one
    pub fn city_center(&self) -> Option<(f64, f64)> {
        self.city_center.and_then(Coordinates::resolve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_points_are_dropped() {
        let payload: LocationsPayload = serde_json::from_value(json!({
            "locations": [
                {"name": "Eiffel Tower", "latitude": 48.8584, "longitude": 2.2945, "type": "attraction"},
                {"name": "Hotel Lutetia", "latitude": "48.8511", "longitude": "2.3274", "type": "Hotel"},
                {"name": "Nowhere", "latitude": 123.0, "longitude": 2.0},
                {"name": "Missing"}
            ],
            "city_center": {"latitude": 48.8566, "longitude": 2.3522}
        }))
        .unwrap();

        let points = payload.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].kind, PointKind::Hotel);
        assert_eq!(payload.city_center(), Some((48.8566, 2.3522)));
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        assert_eq!(PointKind::parse("museum"), PointKind::Other("museum".to_string()));
        assert_eq!(PointKind::parse(" Shopping "), PointKind::Shopping);
    }
}
