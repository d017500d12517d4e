//! Go Zones - Florida relocation map core
//!
//! This library provides the core functionality behind an interactive map
//! of Florida "go zones": toggleable GeoJSON overlays (grocery distance
//! rings, geology tiers) plus address and coordinate lookup with a single
//! result marker.
//!
//! # Modules
//!
//! - [`layer`] - layer descriptors, GeoJSON decoding and the layer registry
//! - [`resolver`] - address/coordinate resolution and the result marker
//! - [`provider`] - geocoders and the HTTP client seam
//! - [`surface`] - the map viewport seam and an in-memory implementation
//! - [`coord`] - coordinate parsing and validation
//! - [`config`] - `~/.gozones/config.ini` handling
//! - [`app`] - session bootstrap
//! - [`logging`] - tracing setup

pub mod app;
pub mod config;
pub mod coord;
pub mod layer;
pub mod logging;
pub mod provider;
pub mod resolver;
pub mod surface;
