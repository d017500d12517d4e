//! OpenStreetMap Nominatim geocoder (secondary provider).
//!
//! Community geocoder used when the Census geocoder has no answer.
//!
//! # URL Pattern
//!
//! `https://nominatim.openstreetmap.org/search?format=json&limit=1&addressdetails=1&countrycodes=us&q={q}`
//!
//! - Requires an identifying `User-Agent` header (usage policy)
//! - Scoped to the United States to reduce ambiguity
//! - `lat`/`lon` come back as strings

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::coord::ResolvedPoint;
use crate::provider::{AsyncHttpClient, GeocodeOutcome, GeocodeProvider, ProviderError};

/// Default search endpoint.
pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Country scope for searches.
const COUNTRY_CODES: &str = "us";

/// Label for points answered by this provider.
pub const SECONDARY_LABEL: &str = "secondary";

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Nominatim search geocoder.
pub struct NominatimGeocoder<C: AsyncHttpClient> {
    http_client: C,
    base_url: Url,
    user_agent: String,
}

impl<C: AsyncHttpClient> NominatimGeocoder<C> {
    /// Creates a geocoder against the public endpoint.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `user_agent` - Identification sent with every request
    pub fn new(http_client: C, user_agent: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: Url::parse(NOMINATIM_BASE_URL).expect("NOMINATIM_BASE_URL is a valid URL"),
            user_agent: user_agent.into(),
        }
    }

    /// Creates a geocoder against a custom endpoint.
    pub fn with_endpoint(
        http_client: C,
        base_url: &str,
        user_agent: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url).map_err(|e| ProviderError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            http_client,
            base_url,
            user_agent: user_agent.into(),
        })
    }

    /// Builds the request URL for a query.
    fn build_url(&self, query: &str) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", "1")
            .append_pair("addressdetails", "1")
            .append_pair("countrycodes", COUNTRY_CODES)
            .append_pair("q", query);
        url.into()
    }
}

/// Decodes a Nominatim response body into an outcome.
fn parse_response(body: &[u8]) -> GeocodeOutcome {
    let places: Vec<NominatimPlace> = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => {
            return GeocodeOutcome::Error(ProviderError::InvalidResponse(format!(
                "Nominatim response: {}",
                e
            )))
        }
    };

    let Some(first) = places.into_iter().next() else {
        return GeocodeOutcome::Miss(
            "Address not found by the Census or OpenStreetMap geocoders".to_string(),
        );
    };

    let (Ok(lat), Ok(lng)) = (first.lat.trim().parse::<f64>(), first.lon.trim().parse::<f64>())
    else {
        return GeocodeOutcome::Error(ProviderError::InvalidResponse(format!(
            "Nominatim returned non-numeric coordinates '{}', '{}'",
            first.lat, first.lon
        )));
    };

    match ResolvedPoint::new(lat, lng, first.display_name, SECONDARY_LABEL) {
        Ok(point) => GeocodeOutcome::Match(point),
        Err(e) => GeocodeOutcome::Error(ProviderError::InvalidResponse(e.to_string())),
    }
}

impl<C: AsyncHttpClient> GeocodeProvider for NominatimGeocoder<C> {
    async fn geocode(&self, query: &str) -> GeocodeOutcome {
        let url = self.build_url(query);
        debug!(provider = "nominatim", url = %url, "Geocoding address");

        let headers = [("User-Agent", self.user_agent.as_str())];
        match self.http_client.get_with_headers(&url, &headers).await {
            Ok(body) => parse_response(&body),
            Err(e) => GeocodeOutcome::Error(e),
        }
    }

    fn name(&self) -> &str {
        "Nominatim"
    }

    fn label(&self) -> &str {
        SECONDARY_LABEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockAsyncHttpClient;

    const ONE_PLACE: &str = r#"[{
        "place_id": 1,
        "lat": "28.5383",
        "lon": "-81.3792",
        "display_name": "Orlando, Orange County, Florida, United States"
    }]"#;

    #[test]
    fn test_url_construction() {
        let provider = NominatimGeocoder::new(MockAsyncHttpClient::new(), "test-agent");

        let url = provider.build_url("Orlando FL");
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/search\
             ?format=json&limit=1&addressdetails=1&countrycodes=us&q=Orlando+FL"
        );
    }

    #[tokio::test]
    async fn test_sends_identification_header() {
        let client = MockAsyncHttpClient::new().with_body("nominatim", ONE_PLACE);
        let provider = NominatimGeocoder::new(client.clone(), "gozones-test/1.0");

        provider.geocode("Orlando").await;

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0]
            .headers
            .contains(&("User-Agent".to_string(), "gozones-test/1.0".to_string())));
    }

    #[tokio::test]
    async fn test_first_place_matches() {
        let client = MockAsyncHttpClient::new().with_body("nominatim", ONE_PLACE);
        let provider = NominatimGeocoder::new(client, "ua");

        match provider.geocode("Orlando").await {
            GeocodeOutcome::Match(point) => {
                assert_eq!(point.lat, 28.5383);
                assert_eq!(point.lng, -81.3792);
                assert_eq!(point.provider, "secondary");
                assert!(point.label.starts_with("Orlando"));
            }
            other => panic!("Expected match, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_array_is_miss() {
        let client = MockAsyncHttpClient::new().with_body("nominatim", "[]");
        let provider = NominatimGeocoder::new(client, "ua");

        assert!(matches!(
            provider.geocode("nowhere").await,
            GeocodeOutcome::Miss(_)
        ));
    }

    #[test]
    fn test_non_numeric_coordinates_are_error() {
        let body = r#"[{"lat": "north", "lon": "-81", "display_name": "x"}]"#;
        assert!(matches!(
            parse_response(body.as_bytes()),
            GeocodeOutcome::Error(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_object_instead_of_array_is_error() {
        assert!(matches!(
            parse_response(br#"{"error": "Unable to geocode"}"#),
            GeocodeOutcome::Error(ProviderError::InvalidResponse(_))
        ));
    }
}
