//! Zone layers.
//!
//! A zone layer is a named GeoJSON overlay (a grocery distance ring or a
//! geology tier) that the user can show or hide. [`LayerSpec`] describes
//! one layer, [`GeoRegion`] holds its decoded data, and [`LayerRegistry`]
//! owns load state and visibility for all of them.

mod geometry;
mod registry;
mod spec;

pub use geometry::{Bounds, GeoRegion, GeometryError, RegionFeature};
pub use registry::{
    LayerLoadError, LayerRegistry, LayerSnapshot, LoadReport, LoadStatus, RegistryError,
    ToggleEffect,
};
pub use spec::{default_layers, LayerKey, LayerSpec, SpecError, StyleSpec};
