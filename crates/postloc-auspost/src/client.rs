//! HTTP client for the Australia Post postcode search endpoint.
//!
//! Sends the server-held API key in the `auth-key` header. The raw JSON body
//! is returned untouched so the proxy can forward it; [`crate::types`] has the
//! typed view used by callers that need locality coordinates.

use reqwest::{Client, Url};

use crate::error::AusPostError;

const DEFAULT_BASE_URL: &str = "https://digitalapi.auspost.com.au";
const SEARCH_PATH: &str = "postcode/search.json";
const AUTH_HEADER: &str = "auth-key";

/// Client for `GET /postcode/search.json`.
///
/// Use [`AusPostClient::new`] for production or
/// [`AusPostClient::with_base_url`] to point at a mock server in tests.
/// Requests are never retried and use the transport's default timeouts.
#[derive(Debug, Clone)]
pub struct AusPostClient {
    client: Client,
    api_key: String,
    search_url: Url,
}

impl AusPostClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`AusPostError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str) -> Result<Self, AusPostError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AusPostError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`AusPostError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, AusPostError> {
        let client = Client::builder()
            .user_agent("postloc/0.1 (postcode-proxy)")
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|base| base.join(SEARCH_PATH))
            .map_err(|e| AusPostError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            search_url,
        })
    }

    /// Looks up `postcode` and returns the upstream JSON body as-is.
    ///
    /// The upstream status code is not treated as an error: any body that
    /// parses as JSON is returned, and non-2xx statuses are logged.
    ///
    /// # Errors
    ///
    /// - [`AusPostError::Http`] if the request cannot be sent or the body
    ///   cannot be read.
    /// - [`AusPostError::Deserialize`] if the body is not valid JSON.
    pub async fn search_postcode(&self, postcode: &str) -> Result<serde_json::Value, AusPostError> {
        let url = self.search_url_for(postcode);
        let response = self
            .client
            .get(url)
            .header(AUTH_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                postcode,
                status = status.as_u16(),
                "postcode search returned non-success status"
            );
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AusPostError::Deserialize {
            context: format!("postcode search (q={postcode})"),
            source: e,
        })
    }

    /// Builds the search URL with the postcode percent-encoded as `q`.
    fn search_url_for(&self, postcode: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("q", postcode);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> AusPostClient {
        AusPostClient::with_base_url("test-key", base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn search_url_appends_path_and_query() {
        let client = test_client("https://digitalapi.auspost.com.au");
        assert_eq!(
            client.search_url_for("3000").as_str(),
            "https://digitalapi.auspost.com.au/postcode/search.json?q=3000"
        );
    }

    #[test]
    fn search_url_handles_trailing_slash_and_prefix_path() {
        let client = test_client("http://127.0.0.1:8080/mock/");
        assert_eq!(
            client.search_url_for("2000").as_str(),
            "http://127.0.0.1:8080/mock/postcode/search.json?q=2000"
        );
    }

    #[test]
    fn search_url_encodes_special_characters() {
        let client = test_client("https://digitalapi.auspost.com.au");
        let url = client.search_url_for("30 00&x=1");
        assert!(
            url.as_str().ends_with("?q=30+00%26x%3D1"),
            "query should be percent-encoded: {url}"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = AusPostClient::with_base_url("k", "not a url");
        assert!(matches!(result, Err(AusPostError::InvalidBaseUrl { .. })));
    }
}
