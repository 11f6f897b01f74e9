use thiserror::Error;

/// Why a location could not be resolved. Every variant leaves the page
/// masked; the shopper can still enter a postcode by hand.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("malformed response from {context}: {reason}")]
    Malformed { context: String, reason: String },

    #[error("no locality with coordinates for postcode {postcode}")]
    NoLocality { postcode: String },

    #[error("reverse geocoding returned no postcode")]
    NoPostcode,

    #[error("geolocation failed: {0}")]
    Geolocation(String),

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failures of the persistent key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
