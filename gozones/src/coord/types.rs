//! Geographic coordinate types.

use std::fmt;

use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Provider label used for points parsed from raw coordinate text.
pub const COORDINATES_PROVIDER: &str = "coordinates";

/// Errors produced while parsing or validating coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Text does not have the `lat, lng` shape.
    #[error("Expected coordinates as 'lat, lng' (e.g. 28.4, -82.5), got '{0}'")]
    Malformed(String),

    /// A token matched the shape but is not a finite number.
    #[error("Coordinate '{0}' is not a finite number")]
    NotFinite(String),

    /// Latitude outside [-90, 90].
    #[error("Latitude {0} is outside the range -90 to 90")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180].
    #[error("Longitude {0} is outside the range -180 to 180")]
    InvalidLongitude(f64),
}

/// A WGS84 position in degrees, latitude first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a validated position.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lng) {
            return Err(CoordError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// A point produced by the location resolver.
///
/// `provider` names which source answered: `"primary"` or `"secondary"`
/// for the geocoders, [`COORDINATES_PROVIDER`] for typed coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPoint {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
    pub provider: String,
}

impl ResolvedPoint {
    /// Creates a point, rejecting out-of-range coordinates.
    pub fn new(
        lat: f64,
        lng: f64,
        label: impl Into<String>,
        provider: impl Into<String>,
    ) -> Result<Self, CoordError> {
        let position = LatLng::new(lat, lng)?;
        Ok(Self {
            lat: position.lat,
            lng: position.lng,
            label: label.into(),
            provider: provider.into(),
        })
    }

    /// The point's position.
    pub fn position(&self) -> LatLng {
        LatLng {
            lat: self.lat,
            lng: self.lng,
        }
    }

    /// Text shown on the marker for this point.
    pub fn marker_label(&self) -> String {
        format!("{} ({})", self.label, self.provider)
    }
}
