pub mod assembler;
pub mod fallback;
pub mod palette;

use serde::Serialize;

pub use assembler::{MapArtifact, MapAssembler, DEFAULT_ZOOM};
pub use fallback::{city_center_or_default, lookup_city_center};
pub use palette::MarkerColor;

use crate::types::GeoPoint;

/// Where the map's points came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapSource {
    /// Coordinates generated by the service for the itinerary's activities
    Generated,
    /// Static city-centre table, used because generation was not usable
    StaticFallback { reason: String },
}

/// Map section of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryMap {
    pub center: GeoPoint,
    pub points: Vec<GeoPoint>,
    pub source: MapSource,
    #[serde(skip)]
    pub artifact: MapArtifact,
}

impl ItineraryMap {
    pub fn html(&self) -> &str {
        self.artifact.as_html()
    }
}
