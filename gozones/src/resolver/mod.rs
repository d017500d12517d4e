//! Location resolver.
//!
//! Turns user input (a free-text address or typed coordinates) into a
//! single marker on the map. There is at most one marker; each new result
//! replaces the previous one.
//!
//! # Request sequencing
//!
//! Every request takes a sequence number when it starts. When an address
//! lookup finishes, its result is only applied if no newer request has
//! started in the meantime; otherwise it is dropped with
//! [`ResolveError::Superseded`]. A slow answer to an old search can
//! therefore never move a marker placed by a newer one.

mod address;

pub use address::normalize_address;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::coord::{self, CoordError, ResolvedPoint};
use crate::provider::{GeocodeProvider, GeocoderChain};
use crate::surface::{MapSurface, Overlay, OverlayId, SharedSurface};

/// Zoom used for geocoded addresses (city scale).
pub const ADDRESS_ZOOM: u8 = 12;

/// Zoom used for typed coordinates (neighborhood scale).
pub const COORDINATE_ZOOM: u8 = 14;

/// Errors returned by the resolver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The input failed validation before any lookup.
    #[error("{0}")]
    InvalidInput(String),

    /// Every geocoder missed or failed.
    #[error("{0}")]
    NotFound(String),

    /// A newer request started before this one finished.
    #[error("Superseded by a newer request")]
    Superseded,
}

impl From<CoordError> for ResolveError {
    fn from(e: CoordError) -> Self {
        ResolveError::InvalidInput(e.to_string())
    }
}

/// What the status line shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverStatus {
    Idle,
    Searching { query: String },
    Resolved(ResolvedPoint),
    Failed(String),
}

impl fmt::Display for ResolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverStatus::Idle => write!(f, "Ready"),
            ResolverStatus::Searching { query } => write!(f, "Searching for \"{}\"...", query),
            ResolverStatus::Resolved(point) => write!(
                f,
                "Found {} at {:.5}, {:.5} via {}",
                point.label, point.lat, point.lng, point.provider
            ),
            ResolverStatus::Failed(reason) => write!(f, "Failed: {}", reason),
        }
    }
}

struct ResolverState {
    /// Sequence number of the newest request.
    latest: u64,
    status: ResolverStatus,
    marker: Option<ResolvedPoint>,
}

impl ResolverState {
    fn begin(&mut self, status: ResolverStatus) -> u64 {
        self.latest += 1;
        self.status = status;
        self.latest
    }
}

/// Resolves addresses and coordinates and owns the single map marker.
///
/// Clones share the same marker, status and sequence counter.
pub struct LocationResolver<S: MapSurface, P: GeocodeProvider> {
    chain: Arc<GeocoderChain<P>>,
    surface: SharedSurface<S>,
    state: Arc<Mutex<ResolverState>>,
}

impl<S: MapSurface, P: GeocodeProvider> Clone for LocationResolver<S, P> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
            surface: Arc::clone(&self.surface),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: MapSurface, P: GeocodeProvider> LocationResolver<S, P> {
    pub fn new(chain: GeocoderChain<P>, surface: SharedSurface<S>) -> Self {
        Self {
            chain: Arc::new(chain),
            surface,
            state: Arc::new(Mutex::new(ResolverState {
                latest: 0,
                status: ResolverStatus::Idle,
                marker: None,
            })),
        }
    }

    pub fn status(&self) -> ResolverStatus {
        self.state.lock().status.clone()
    }

    /// The point the marker currently shows.
    pub fn marker(&self) -> Option<ResolvedPoint> {
        self.state.lock().marker.clone()
    }

    /// Geocodes a free-text address and marks it on the map.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidInput`] if nothing is left after normalizing
    /// - [`ResolveError::NotFound`] with the last geocoder's detail if no
    ///   geocoder matched
    /// - [`ResolveError::Superseded`] if a newer request started while this
    ///   one was in flight; marker and status are left to the newer one
    pub async fn resolve_address(&self, raw: &str) -> Result<ResolvedPoint, ResolveError> {
        let Some(query) = normalize_address(raw) else {
            let error = ResolveError::InvalidInput("Enter an address to search for".to_string());
            self.reject(&error);
            return Err(error);
        };

        let seq = self.state.lock().begin(ResolverStatus::Searching {
            query: query.clone(),
        });
        debug!(seq, query = %query, "Address lookup started");

        let result = self.chain.lookup(&query).await;

        let mut state = self.state.lock();
        if state.latest != seq {
            debug!(seq, latest = state.latest, "Discarding stale address result");
            return Err(ResolveError::Superseded);
        }

        match result {
            Ok(point) => {
                self.place_marker_locked(&mut state, &point, ADDRESS_ZOOM);
                state.status = ResolverStatus::Resolved(point.clone());
                Ok(point)
            }
            Err(exhausted) => {
                warn!(
                    query = %query,
                    attempts = exhausted.attempts.len(),
                    detail = %exhausted.detail,
                    "Address not found"
                );
                state.status = ResolverStatus::Failed(exhausted.detail.clone());
                Err(ResolveError::NotFound(exhausted.detail))
            }
        }
    }

    /// Parses `"lat, lng"` text and marks it on the map.
    ///
    /// Never touches the network and never suspends. Supersedes any
    /// address lookup still in flight.
    pub fn resolve_coordinates(&self, raw: &str) -> Result<ResolvedPoint, ResolveError> {
        let mut state = self.state.lock();
        state.begin(ResolverStatus::Searching {
            query: raw.trim().to_string(),
        });

        match coord::parse_point(raw) {
            Ok(point) => {
                info!(lat = point.lat, lng = point.lng, "Coordinates plotted");
                self.place_marker_locked(&mut state, &point, COORDINATE_ZOOM);
                state.status = ResolverStatus::Resolved(point.clone());
                Ok(point)
            }
            Err(e) => {
                let error = ResolveError::from(e);
                state.status = ResolverStatus::Failed(error.to_string());
                Err(error)
            }
        }
    }

    /// Replaces the marker with one at `point` and recenters on it.
    pub fn place_marker(&self, point: &ResolvedPoint, zoom: u8) {
        let mut state = self.state.lock();
        self.place_marker_locked(&mut state, point, zoom);
    }

    /// Removes the marker, if any, and resets the status.
    ///
    /// Also supersedes any address lookup still in flight, so a late answer
    /// cannot bring the marker back.
    pub fn clear_marker(&self) {
        let mut state = self.state.lock();
        state.begin(ResolverStatus::Idle);
        if state.marker.take().is_some() {
            self.surface.lock().remove_overlay(&OverlayId::Marker);
            debug!("Marker cleared");
        }
    }

    fn place_marker_locked(&self, state: &mut ResolverState, point: &ResolvedPoint, zoom: u8) {
        let mut surface = self.surface.lock();
        surface.remove_overlay(&OverlayId::Marker);
        surface.add_overlay(
            OverlayId::Marker,
            Overlay::Marker {
                position: point.position(),
                label: point.marker_label(),
            },
        );
        surface.set_view(point.position(), zoom);
        state.marker = Some(point.clone());
    }

    fn reject(&self, error: &ResolveError) {
        let mut state = self.state.lock();
        state.begin(ResolverStatus::Failed(error.to_string()));
    }
}
