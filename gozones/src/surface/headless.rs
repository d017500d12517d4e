//! In-memory map surface.

use std::collections::BTreeMap;

use tracing::trace;

use super::{MapSurface, MapViewConfig, Overlay, OverlayId, TileLayer};
use crate::coord::LatLng;

/// A map surface with no rendering that records what is on it.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    center: LatLng,
    zoom: u8,
    min_zoom: u8,
    max_zoom: u8,
    base_layer: Option<TileLayer>,
    overlays: BTreeMap<OverlayId, Overlay>,
}

impl HeadlessSurface {
    /// Creates a surface showing the configured initial view.
    pub fn new(config: &MapViewConfig) -> Self {
        let mut surface = Self {
            center: config.center,
            zoom: config.zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            base_layer: None,
            overlays: BTreeMap::new(),
        };
        surface.set_view(config.center, config.zoom);
        surface.attach_base_layer(config.base_layer.clone());
        surface
    }

    /// Current center and zoom.
    pub fn view(&self) -> (LatLng, u8) {
        (self.center, self.zoom)
    }

    /// Current base layer, if one is attached.
    pub fn base_layer(&self) -> Option<&TileLayer> {
        self.base_layer.as_ref()
    }

    /// The overlay attached under `id`.
    pub fn overlay(&self, id: &OverlayId) -> Option<&Overlay> {
        self.overlays.get(id)
    }

    /// Ids of every attached overlay, in id order.
    pub fn attached(&self) -> Vec<OverlayId> {
        self.overlays.keys().cloned().collect()
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(&MapViewConfig::default())
    }
}

impl MapSurface for HeadlessSurface {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        trace!(center = %center, zoom = self.zoom, "View set");
    }

    fn add_overlay(&mut self, id: OverlayId, overlay: Overlay) {
        if self.overlays.contains_key(&id) {
            return;
        }
        trace!(id = %id, "Overlay added");
        self.overlays.insert(id, overlay);
    }

    fn remove_overlay(&mut self, id: &OverlayId) -> bool {
        let removed = self.overlays.remove(id).is_some();
        if removed {
            trace!(id = %id, "Overlay removed");
        }
        removed
    }

    fn has_overlay(&self, id: &OverlayId) -> bool {
        self.overlays.contains_key(id)
    }

    fn attach_base_layer(&mut self, layer: TileLayer) {
        self.base_layer = Some(layer);
    }
}
