//! Reverse geocoding and geolocation.
//!
//! [`GeocodeClient`] turns a GPS position into a postal address via a
//! third-party HTTP API; [`PositionProvider`] abstracts over where the
//! position comes from so tests (and headless environments) can supply one
//! without real GPS hardware.

use marigold_core::Pincode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use marigold_core::address::AddressDraft;

use crate::config::GeocodeConfig;

/// A GPS position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Errors from acquiring a device position.
///
/// Neither variant is fatal: callers surface them to the user and fall back
/// to manual address entry.
#[derive(Debug, Clone, Error)]
pub enum PositionError {
    /// The user denied the location permission.
    #[error("location permission denied")]
    PermissionDenied,
    /// The device has no geolocation capability.
    #[error("geolocation is not supported on this device")]
    Unsupported,
}

/// Source of the device's current position.
pub trait PositionProvider {
    /// Request the current position.
    fn current_position(
        &self,
    ) -> impl std::future::Future<Output = Result<GeoPosition, PositionError>> + Send;
}

/// Errors that can occur when reverse-geocoding.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        message: String,
    },

    /// The API returned no result for the position.
    #[error("no address found for {latitude},{longitude}")]
    NoResult { latitude: f64, longitude: f64 },
}

/// A postal address record from the geocoding API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAddress {
    /// Human-readable single-line address.
    pub formatted: String,
    /// Postal pincode, when the API reports one.
    pub pincode: Option<String>,
    /// City, when the API reports one.
    pub city: Option<String>,
    /// State or region, when the API reports one.
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted: String,
    #[serde(default)]
    components: GeocodeComponents,
}

#[derive(Debug, Default, Deserialize)]
struct GeocodeComponents {
    #[serde(default)]
    postcode: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

/// Reverse-geocoding API client.
///
/// Holds the API key as a [`SecretString`]; it is exposed only while
/// building a request.
#[derive(Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl std::fmt::Debug for GeocodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GeocodeClient {
    /// Create a new geocoding client.
    #[must_use]
    pub fn new(config: &GeocodeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }

    /// Resolve a position to a postal address.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError` if the request fails, the API rejects it, or
    /// no address exists for the position.
    #[instrument(skip(self))]
    pub async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<PostalAddress, GeocodeError> {
        let url = format!("{}/json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", format!("{latitude}+{longitude}")),
                ("key", self.api_key.expose_secret().to_owned()),
                ("no_annotations", "1".to_owned()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GeocodeResponse = response.json().await?;

        let result = body.results.into_iter().next().ok_or(GeocodeError::NoResult {
            latitude,
            longitude,
        })?;

        let city = result.components.city.or(result.components.town);

        Ok(PostalAddress {
            formatted: result.formatted,
            pincode: result.components.postcode,
            city,
            state: result.components.state,
        })
    }
}

impl PostalAddress {
    /// Prefill an address form from this record.
    ///
    /// Street/pincode/city/state come from the geocoder; name and phone are
    /// left for the user. Fields the API reported in a shape our validators
    /// reject are left blank rather than prefilled with garbage.
    #[must_use]
    pub fn into_draft(self) -> AddressDraft {
        let pincode = self
            .pincode
            .filter(|p| Pincode::parse(p).is_ok())
            .unwrap_or_default();

        AddressDraft {
            name: String::new(),
            phone: String::new(),
            pincode,
            address: self.formatted,
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> GeocodeClient {
        GeocodeClient::new(&GeocodeConfig {
            base_url: Url::parse(&server.url()).unwrap(),
            api_key: SecretString::from("test-key".to_string()),
        })
    }

    #[tokio::test]
    async fn test_reverse_parses_components() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"results":[{"formatted":"12 MG Road, Bengaluru 560001, India",
                    "components":{"postcode":"560001","city":"Bengaluru","state":"Karnataka"}}]}"#,
            )
            .create_async()
            .await;

        let address = client_for(&server).reverse(12.97, 77.59).await.unwrap();
        assert_eq!(address.pincode.as_deref(), Some("560001"));
        assert_eq!(address.city.as_deref(), Some("Bengaluru"));
        assert_eq!(address.state.as_deref(), Some("Karnataka"));
    }

    #[tokio::test]
    async fn test_reverse_empty_results() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results":[]}"#)
            .create_async()
            .await;

        let err = client_for(&server).reverse(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, GeocodeError::NoResult { .. }));
    }

    #[tokio::test]
    async fn test_reverse_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/json")
            .match_query(mockito::Matcher::Any)
            .with_status(402)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let err = client_for(&server).reverse(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Api { status: 402, .. }));
    }

    #[test]
    fn test_client_debug_redacts_key() {
        let client = GeocodeClient::new(&GeocodeConfig {
            base_url: Url::parse("https://geo.example.com/v1").unwrap(),
            api_key: SecretString::from("kf8a72bx91m3".to_string()),
        });
        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("kf8a72bx91m3"));
    }

    #[test]
    fn test_into_draft_drops_invalid_pincode() {
        let address = PostalAddress {
            formatted: "Somewhere".to_owned(),
            pincode: Some("ABC123".to_owned()),
            city: Some("Bengaluru".to_owned()),
            state: None,
        };

        let draft = address.into_draft();
        assert!(draft.pincode.is_empty());
        assert_eq!(draft.city, "Bengaluru");
    }

    #[test]
    fn test_into_draft_uses_town_fallback() {
        let response: GeocodeResponse = serde_json::from_str(
            r#"{"results":[{"formatted":"X","components":{"town":"Udupi","postcode":"576101"}}]}"#,
        )
        .unwrap();
        let result = response.results.into_iter().next().unwrap();
        let city = result.components.city.or(result.components.town);
        assert_eq!(city.as_deref(), Some("Udupi"));
    }
}
