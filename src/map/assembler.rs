use serde::Serialize;
use tracing::debug;

use super::palette::MarkerColor;
use crate::types::GeoPoint;

pub const DEFAULT_ZOOM: u8 = 12;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const CLUSTER_CSS: &[&str] = &[
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css",
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css",
];
const CLUSTER_JS: &str = "https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js";

/// Rendered, embeddable map (a standalone HTML document)
#[derive(Debug, Clone, PartialEq)]
pub struct MapArtifact {
    html: String,
    marker_count: usize,
}

impl MapArtifact {
    pub fn as_html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    pub fn marker_count(&self) -> usize {
        self.marker_count
    }
}

#[derive(Serialize)]
struct MarkerSpec {
    lat: f64,
    lng: f64,
    color: &'static str,
    tooltip: String,
    popup: String,
}

impl MarkerSpec {
    fn from_point(point: &GeoPoint) -> Self {
        let name = escape_html(&point.name);
        Self {
            lat: point.latitude,
            lng: point.longitude,
            color: MarkerColor::for_kind(&point.kind).as_str(),
            popup: format!("<b>{}</b><br>Type: {}", name, escape_html(point.kind.as_str())),
            tooltip: point
                .tooltip
                .as_deref()
                .map(escape_html)
                .unwrap_or(name),
        }
    }
}

/// Renders geographic points onto an OpenStreetMap base layer.
#[derive(Debug, Clone)]
pub struct MapAssembler {
    zoom: u8,
    clustering: bool,
}

impl Default for MapAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl MapAssembler {
    pub fn new() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            clustering: false,
        }
    }

    /// Group nearby markers into clusters when zoomed out
    pub fn with_clustering(mut self, clustering: bool) -> Self {
        self.clustering = clustering;
        self
    }

    pub fn build_map(&self, center: &GeoPoint, points: &[GeoPoint]) -> MapArtifact {
        let markers: Vec<MarkerSpec> = points.iter().map(MarkerSpec::from_point).collect();
        debug!(
            target: "itinerary::map",
            center = %center.name,
            markers = markers.len(),
            clustering = self.clustering,
            "building map"
        );

        let markers_json = script_safe_json(&markers);
        let (cluster_assets, layer) = if self.clustering {
            let links: String = CLUSTER_CSS
                .iter()
                .map(|href| format!("<link rel=\"stylesheet\" href=\"{}\">\n", href))
                .collect();
            (
                format!("{}<script src=\"{}\"></script>\n", links, CLUSTER_JS),
                "L.markerClusterGroup()",
            )
        } else {
            (String::new(), "L.layerGroup()")
        };

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="{leaflet_css}">
<script src="{leaflet_js}"></script>
{cluster_assets}<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([{lat}, {lng}], {zoom});
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  maxZoom: 19,
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
var markers = {markers_json};
var layer = {layer};
markers.forEach(function (m) {{
  L.circleMarker([m.lat, m.lng], {{ radius: 9, color: m.color, fillColor: m.color, fillOpacity: 0.8 }})
    .bindPopup(m.popup, {{ maxWidth: 200 }})
    .bindTooltip(m.tooltip)
    .addTo(layer);
}});
layer.addTo(map);
</script>
</body>
</html>
"#,
            title = escape_html(&center.name),
            leaflet_css = LEAFLET_CSS,
            leaflet_js = LEAFLET_JS,
            cluster_assets = cluster_assets,
            lat = center.latitude,
            lng = center.longitude,
            zoom = self.zoom,
            markers_json = markers_json,
            layer = layer,
        );

        MapArtifact {
            html,
            marker_count: markers.len(),
        }
    }
}

/// JSON that can sit inside a `<script>` element without closing it.
fn script_safe_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
