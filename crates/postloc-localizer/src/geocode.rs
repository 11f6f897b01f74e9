//! Device position and reverse geocoding.

use async_trait::async_trait;
use postloc_core::Coordinates;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::ResolutionError;

/// Source of the device's current position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Whether a position can be requested at all.
    fn is_available(&self) -> bool;

    async fn current_position(&self) -> Result<Coordinates, ResolutionError>;
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    fn is_available(&self) -> bool {
        true
    }

    async fn current_position(&self) -> Result<Coordinates, ResolutionError> {
        Ok(self.0)
    }
}

/// A device without positioning support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates, ResolutionError> {
        Err(ResolutionError::Geolocation(
            "geolocation is not available".to_owned(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    #[serde(default)]
    postcode: Option<serde_json::Value>,
}

/// Client for a `reverse-geocode-client` style endpoint that maps
/// coordinates to a postcode.
#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    client: Client,
    url: Url,
}

impl ReverseGeocoder {
    /// # Errors
    ///
    /// Returns [`ResolutionError::InvalidUrl`] if `url` does not parse, or
    /// [`ResolutionError::Http`] if the HTTP client cannot be built.
    pub fn new(url: &str) -> Result<Self, ResolutionError> {
        let client = Client::builder()
            .user_agent("postloc/0.1 (price-localizer)")
            .build()?;
        let url = Url::parse(url).map_err(|e| ResolutionError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, url })
    }

    /// Returns the postcode at `at`.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::Http`] on transport failure.
    /// - [`ResolutionError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ResolutionError::Malformed`] if the body is not JSON.
    /// - [`ResolutionError::NoPostcode`] if the response has no postcode.
    pub async fn postcode_for(&self, at: Coordinates) -> Result<String, ResolutionError> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("latitude", &at.latitude.to_string())
            .append_pair("longitude", &at.longitude.to_string())
            .append_pair("localityLanguage", "en");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolutionError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: ReverseGeocodeResponse =
            serde_json::from_str(&body).map_err(|e| ResolutionError::Malformed {
                context: "reverse geocoder".to_owned(),
                reason: e.to_string(),
            })?;

        // Some regions report the postcode as a number.
        let postcode = match parsed.postcode {
            Some(serde_json::Value::String(s)) => s.trim().to_owned(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        if postcode.is_empty() {
            return Err(ResolutionError::NoPostcode);
        }
        Ok(postcode)
    }
}
