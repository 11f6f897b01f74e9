use axum::body::{to_bytes, Body};
use axum::http::{header as http_header, Method, Request, StatusCode};
use axum::Router;
use postloc_auspost::AusPostClient;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::api::{build_app, AppState};

fn app_with_upstream(base_url: &str) -> Router {
    let client = AusPostClient::with_base_url("test-key", base_url).expect("client");
    build_app(AppState {
        upstream: Some(client),
    })
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, body.to_vec())
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).expect("json parse")
}

#[tokio::test]
async fn missing_postcode_returns_400() {
    let server = MockServer::start().await;
    let (status, body) = send(
        app_with_upstream(&server.uri()),
        Method::GET,
        "/validatePostcode",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body), serde_json::json!({ "error": "Postcode is required" }));
}

#[tokio::test]
async fn blank_postcode_returns_400() {
    let server = MockServer::start().await;
    let (status, body) = send(
        app_with_upstream(&server.uri()),
        Method::GET,
        "/validatePostcode?postcode=",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "Postcode is required");
}

#[tokio::test]
async fn missing_api_key_returns_500() {
    let app = build_app(AppState { upstream: None });
    let (status, body) = send(app, Method::GET, "/validatePostcode?postcode=3000").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json(&body),
        serde_json::json!({ "error": "API key is not configured" })
    );
}

#[tokio::test]
async fn missing_postcode_is_checked_before_api_key() {
    let app = build_app(AppState { upstream: None });
    let (status, _) = send(app, Method::GET, "/validatePostcode").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn successful_lookup_returns_upstream_json_verbatim() {
    let server = MockServer::start().await;
    let upstream_body = serde_json::json!({
        "localities": {
            "locality": [{
                "category": "Delivery Area",
                "id": 657,
                "latitude": -37.814_563,
                "location": "MELBOURNE",
                "longitude": 144.970_267,
                "postcode": 3000,
                "state": "VIC"
            }]
        }
    });

    Mock::given(method("GET"))
        .and(path("/postcode/search.json"))
        .and(query_param("q", "3000"))
        .and(header("auth-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&upstream_body))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        app_with_upstream(&server.uri()),
        Method::GET,
        "/api/validatePostcode?postcode=3000",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), upstream_body);
}

#[tokio::test]
async fn non_json_upstream_returns_500_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/postcode/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let (status, body) = send(
        app_with_upstream(&server.uri()),
        Method::GET,
        "/validatePostcode?postcode=3000",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json(&body),
        serde_json::json!({ "error": "Error parsing response data" })
    );
}

#[tokio::test]
async fn unreachable_upstream_returns_500_fetch_error() {
    let (status, body) = send(
        app_with_upstream("http://127.0.0.1:1"),
        Method::GET,
        "/validatePostcode?postcode=3000",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json(&body),
        serde_json::json!({ "error": "Error fetching data from AusPost API" })
    );
}

#[tokio::test]
async fn options_short_circuits_without_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = app_with_upstream(&server.uri())
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/validatePostcode")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[http_header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[http_header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(
        headers[http_header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET,OPTIONS,PATCH,DELETE,POST,PUT"
    );
    assert_eq!(
        headers[http_header::ACCESS_CONTROL_ALLOW_HEADERS],
        crate::middleware::ALLOW_HEADERS
    );

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    assert!(body.is_empty(), "preflight body must be empty");
}
