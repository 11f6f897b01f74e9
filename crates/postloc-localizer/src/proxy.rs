//! Client for the deployed postcode proxy.

use postloc_auspost::PostcodeSearchResponse;
use postloc_core::Coordinates;
use reqwest::{Client, Url};

use crate::error::ResolutionError;
use crate::types::PostcodeLookupResult;

const LOOKUP_PATH: &str = "api/validatePostcode";

/// Resolves a postcode to coordinates through
/// `GET {proxy}/api/validatePostcode?postcode=..`.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    lookup_url: Url,
}

impl ProxyClient {
    /// # Errors
    ///
    /// Returns [`ResolutionError::InvalidUrl`] if `base_url` does not parse,
    /// or [`ResolutionError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ResolutionError> {
        let client = Client::builder()
            .user_agent("postloc/0.1 (price-localizer)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let lookup_url = Url::parse(&normalised)
            .and_then(|base| base.join(LOOKUP_PATH))
            .map_err(|e| ResolutionError::InvalidUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, lookup_url })
    }

    /// Looks up `postcode`. The result carries the postcode as submitted and
    /// the coordinates of the first locality that has them.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::Http`] on transport failure or an unreadable body.
    /// - [`ResolutionError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ResolutionError::Malformed`] if the body is not a postcode search
    ///   response.
    /// - [`ResolutionError::NoLocality`] if no locality carries coordinates.
    pub async fn lookup(&self, postcode: &str) -> Result<PostcodeLookupResult, ResolutionError> {
        let mut url = self.lookup_url.clone();
        url.query_pairs_mut().append_pair("postcode", postcode);

        tracing::debug!(url = %url, "postcode proxy request");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolutionError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: PostcodeSearchResponse =
            serde_json::from_str(&body).map_err(|e| ResolutionError::Malformed {
                context: "postcode proxy".to_owned(),
                reason: e.to_string(),
            })?;

        let (latitude, longitude) = parsed
            .first_locality()
            .and_then(postloc_auspost::Locality::coordinates)
            .ok_or_else(|| ResolutionError::NoLocality {
                postcode: postcode.to_owned(),
            })?;

        Ok(PostcodeLookupResult {
            postcode: postcode.to_owned(),
            coordinates: Coordinates::new(latitude, longitude),
        })
    }
}
