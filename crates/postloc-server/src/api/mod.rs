mod postcode;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use postloc_auspost::{AusPostClient, AusPostError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_headers, request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; lookups then fail with 500.
    pub upstream: Option<AusPostClient>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    upstream_configured: bool,
}

/// Failure modes of a postcode lookup. Each maps to one status code and one
/// fixed `{"error": ...}` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyError {
    InvalidInput,
    Misconfigured,
    UpstreamUnreachable,
    UpstreamMalformed,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl ProxyError {
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Misconfigured | Self::UpstreamUnreachable | Self::UpstreamMalformed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidInput => "Postcode is required",
            Self::Misconfigured => "API key is not configured",
            Self::UpstreamUnreachable => "Error fetching data from AusPost API",
            Self::UpstreamMalformed => "Error parsing response data",
        }
    }
}

impl From<&AusPostError> for ProxyError {
    fn from(error: &AusPostError) -> Self {
        match error {
            AusPostError::Http(_) => Self::UpstreamUnreachable,
            AusPostError::Deserialize { .. } => Self::UpstreamMalformed,
            AusPostError::InvalidBaseUrl { .. } => Self::Misconfigured,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

pub fn build_app(state: AppState) -> Router {
    let lookup = get(postcode::validate_postcode).options(postcode::preflight);

    Router::new()
        .route("/health", get(health))
        .route("/validatePostcode", lookup.clone())
        .route("/api/validatePostcode", lookup)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(cors_headers)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let upstream_configured = state.upstream.is_some();
    if !upstream_configured {
        tracing::warn!("health check: AUSPOST_API_KEY is not configured");
    }

    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData {
                status: "ok",
                upstream_configured,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}
