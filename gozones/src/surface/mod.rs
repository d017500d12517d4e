//! Map surface seam.
//!
//! The viewport widget (pan/zoom, base tiles, overlays) is an external
//! collaborator. The core only talks to it through [`MapSurface`].
//! [`HeadlessSurface`] is the in-memory implementation used by the CLI and
//! the tests.

mod headless;
mod types;

pub use headless::HeadlessSurface;
pub use types::{
    MapViewConfig, Overlay, OverlayId, TileLayer, DEFAULT_CENTER, DEFAULT_MAX_ZOOM,
    DEFAULT_MIN_ZOOM, DEFAULT_TILE_ATTRIBUTION, DEFAULT_TILE_MAX_ZOOM, DEFAULT_TILE_URL,
    DEFAULT_ZOOM,
};

use std::sync::Arc;

use parking_lot::Mutex;

use crate::coord::LatLng;

/// Operations the core needs from a map viewport.
///
/// Adding an id that is already present and removing one that is absent
/// must both be harmless.
pub trait MapSurface: Send {
    /// Recenters the viewport.
    fn set_view(&mut self, center: LatLng, zoom: u8);

    /// Attaches an overlay under `id`.
    fn add_overlay(&mut self, id: OverlayId, overlay: Overlay);

    /// Detaches the overlay under `id`. Returns whether one was attached.
    fn remove_overlay(&mut self, id: &OverlayId) -> bool;

    /// Whether an overlay is attached under `id`.
    fn has_overlay(&self, id: &OverlayId) -> bool;

    /// Sets the base tile layer.
    fn attach_base_layer(&mut self, layer: TileLayer);
}

/// A surface shared between the layer registry and the location resolver.
pub type SharedSurface<S> = Arc<Mutex<S>>;

/// Wraps a surface for sharing.
pub fn shared<S: MapSurface>(surface: S) -> SharedSurface<S> {
    Arc::new(Mutex::new(surface))
}
