use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{AppState, ProxyError};

#[derive(Debug, Deserialize)]
pub(super) struct PostcodeQuery {
    postcode: Option<String>,
}

/// `OPTIONS` short-circuit. The CORS middleware adds the headers.
pub(super) async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Forwards one postcode lookup upstream and returns the JSON body verbatim.
///
/// Checks run in order: postcode present, API key configured, then exactly
/// one upstream request. Nothing is retried or cached.
pub(super) async fn validate_postcode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<PostcodeQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ProxyError> {
    let postcode = query
        .ok()
        .and_then(|Query(q)| q.postcode)
        .map(|p| p.trim().to_owned())
        .filter(|p| !p.is_empty())
        .ok_or(ProxyError::InvalidInput)?;

    let Some(upstream) = state.upstream.as_ref() else {
        tracing::error!(
            request_id = %req_id.0,
            "postcode lookup rejected: AUSPOST_API_KEY is not configured"
        );
        return Err(ProxyError::Misconfigured);
    };

    match upstream.search_postcode(&postcode).await {
        Ok(payload) => {
            tracing::debug!(request_id = %req_id.0, postcode = %postcode, "postcode lookup ok");
            Ok(Json(payload))
        }
        Err(e) => {
            tracing::error!(
                request_id = %req_id.0,
                postcode = %postcode,
                error = %e,
                "upstream postcode lookup failed"
            );
            Err(ProxyError::from(&e))
        }
    }
}

#[cfg(test)]
#[path = "postcode_test.rs"]
mod tests;
