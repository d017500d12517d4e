//! Map surface types.

use std::fmt;
use std::sync::Arc;

use crate::coord::LatLng;
use crate::layer::{GeoRegion, LayerKey, StyleSpec};

/// Initial center of the map (central Florida).
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 28.4,
    lng: -82.5,
};

/// Initial zoom level (whole peninsula in view).
pub const DEFAULT_ZOOM: u8 = 6;

/// Minimum zoom the viewport allows.
pub const DEFAULT_MIN_ZOOM: u8 = 5;

/// Maximum zoom the viewport allows.
pub const DEFAULT_MAX_ZOOM: u8 = 15;

/// Default base tile URL template.
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Default base tile attribution.
pub const DEFAULT_TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Highest zoom the base tiles are published at.
pub const DEFAULT_TILE_MAX_ZOOM: u8 = 19;

/// Identifies an overlay on the surface.
///
/// Each layer key owns at most one overlay, and there is at most one
/// marker, so the id doubles as the uniqueness guarantee.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverlayId {
    Layer(LayerKey),
    Marker,
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayId::Layer(key) => write!(f, "layer:{}", key),
            OverlayId::Marker => write!(f, "marker"),
        }
    }
}

/// Something drawable on top of the base tiles.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// A styled zone layer.
    Region {
        region: Arc<GeoRegion>,
        style: StyleSpec,
    },
    /// A point marker with a popup label.
    Marker { position: LatLng, label: String },
}

/// Base tile layer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
            max_zoom: DEFAULT_TILE_MAX_ZOOM,
        }
    }
}

/// Viewport settings applied when a surface is created.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewConfig {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub base_layer: TileLayer,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            base_layer: TileLayer::default(),
        }
    }
}
