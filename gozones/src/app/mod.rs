//! Application bootstrap.
//!
//! This module provides the `GoZonesApp` type, which builds a map session
//! from an [`AppConfig`] in one place so the CLI and tests wire components
//! the same way.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     GoZonesApp                       │
//! │                                                      │
//! │  LayerRegistry ──────┐                               │
//! │   (HTTP: GeoJSON)    ├──► SharedSurface              │
//! │  LocationResolver ───┘    (HeadlessSurface)          │
//! │   └── GeocoderChain                                  │
//! │        ├── CensusGeocoder     (primary)              │
//! │        └── NominatimGeocoder  (secondary)            │
//! └──────────────────────────────────────────────────────┘
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::{AppResolver, GoZonesApp};
pub use config::AppConfig;
pub use error::AppError;
