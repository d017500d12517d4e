//! Coordinate parsing and validation.
//!
//! Turns user-typed `"lat, lng"` text into a validated [`ResolvedPoint`].
//! The whole path is synchronous and never touches the network.

mod types;

pub use types::{
    CoordError, LatLng, ResolvedPoint, COORDINATES_PROVIDER, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

use std::sync::OnceLock;

use regex::Regex;

/// Get the coordinate pair pattern.
///
/// Pattern: `<sign?><digits>[.<digits>] , <sign?><digits>[.<digits>]`
/// with optional whitespace around either token.
fn coordinate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*,\s*([+-]?\d+(?:\.\d+)?)\s*$").unwrap()
    })
}

/// Parses a `"lat, lng"` string into a position.
///
/// # Errors
///
/// - [`CoordError::Malformed`] if the text does not have the expected shape
/// - [`CoordError::NotFinite`] if a token overflows to infinity
/// - [`CoordError::InvalidLatitude`] / [`CoordError::InvalidLongitude`]
///   if a value is out of range
pub fn parse_lat_lng(raw: &str) -> Result<LatLng, CoordError> {
    let captures = coordinate_pattern()
        .captures(raw)
        .ok_or_else(|| CoordError::Malformed(raw.trim().to_string()))?;

    let lat = parse_finite(&captures[1])?;
    let lng = parse_finite(&captures[2])?;

    LatLng::new(lat, lng)
}

/// Parses coordinate text into a [`ResolvedPoint`] labelled with the
/// normalized coordinates.
pub fn parse_point(raw: &str) -> Result<ResolvedPoint, CoordError> {
    let position = parse_lat_lng(raw)?;
    ResolvedPoint::new(
        position.lat,
        position.lng,
        position.to_string(),
        COORDINATES_PROVIDER,
    )
}

fn parse_finite(token: &str) -> Result<f64, CoordError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CoordError::NotFinite(token.to_string())),
    }
}
