//! Router tests: authentication, error envelopes, search and probes.
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gaply_gateway::config::Config;
use gaply_gateway::search::PaperIndex;
use gaply_gateway::server::{AppState, ReadinessProbe, create_router};
use gaply_gateway::{JwtVerifier, OpenAlexClient, SearchPipeline, StoreError, UnpaywallClient};

const SECRET: &str = "test-jwt-secret";

struct NoPapers;

#[async_trait]
impl PaperIndex for NoPapers {
    async fn paper_exists(&self, _doi: &str) -> Result<bool, StoreError> {
        Ok(false)
    }
}

struct FixedProbe {
    name: &'static str,
    outcome: Result<(), String>,
}

#[async_trait]
impl ReadinessProbe for FixedProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self) -> Result<(), String> {
        self.outcome.clone()
    }
}

fn state(base_url: &str) -> AppState {
    let config = Config::for_testing(base_url);
    state_with_origins(base_url, config.allowed_origins)
}

fn state_with_origins(base_url: &str, origins: Vec<String>) -> AppState {
    let config = Config::for_testing(base_url);
    let search = SearchPipeline::new(
        Arc::new(OpenAlexClient::new(&config).unwrap()),
        Arc::new(UnpaywallClient::new(&config).unwrap()),
        Arc::new(NoPapers),
    );
    AppState::new(search, JwtVerifier::new(&config.jwt_secret), origins)
}

fn app(base_url: &str) -> axum::Router {
    create_router(Arc::new(state(base_url)))
}

fn token(claims: &Value) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

fn user_token() -> String {
    token(&json!({"sub": "user-1", "email": "user@example.com", "role": "authenticated"}))
}

fn service_token() -> String {
    token(&json!({"sub": "worker", "role": "service_role"}))
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed(method: &str, uri: &str, bearer: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap()
}

// =============================================================================
// Health and readiness
// =============================================================================

#[tokio::test]
async fn test_health() {
    let response = app("http://127.0.0.1:9").oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "gaply-gateway");
}

#[tokio::test]
async fn test_ready_without_probes() {
    let response = app("http://127.0.0.1:9").oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ready");
}

#[tokio::test]
async fn test_ready_reports_failing_dependency() {
    let state = state("http://127.0.0.1:9")
        .with_probe(Arc::new(FixedProbe { name: "database", outcome: Ok(()) }))
        .with_probe(Arc::new(FixedProbe { name: "worker", outcome: Err("connection refused".into()) }));

    let response = create_router(Arc::new(state)).oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["status"], "unavailable");
    assert_eq!(body["checks"]["database"], "ok");
    assert_eq!(body["checks"]["worker"], "connection refused");
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_protected_route_without_header() {
    let response = app("http://127.0.0.1:9").oneshot(get("/api/paper/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Authorization header required");
}

#[tokio::test]
async fn test_protected_route_with_basic_scheme() {
    let request = Request::get("/api/paper/abc")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app("http://127.0.0.1:9").oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid authorization header format");
}

#[tokio::test]
async fn test_protected_route_with_bad_signature() {
    let forged = encode(
        &Header::default(),
        &json!({"sub": "user-1"}),
        &EncodingKey::from_secret(b"someone-elses-secret"),
    )
    .unwrap();

    let response =
        app("http://127.0.0.1:9").oneshot(authed("GET", "/api/paper/abc", &forged)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid token");
}

#[tokio::test]
async fn test_protected_route_with_malformed_claims() {
    let bad_claims = token(&json!({"sub": 42, "role": ["a"]}));

    let response =
        app("http://127.0.0.1:9").oneshot(authed("GET", "/api/paper/abc", &bad_claims)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid token claims");
}

#[tokio::test]
async fn test_protected_routes_are_not_implemented() {
    let routes = [
        ("GET", "/api/paper/p1"),
        ("GET", "/api/paper/p1/evidence"),
        ("PUT", "/api/paper/p1/patch"),
        ("POST", "/api/ingest"),
        ("GET", "/api/ingest/j1"),
        ("POST", "/api/paraphrase"),
        ("POST", "/api/proofread"),
        ("POST", "/api/journal-check"),
        ("POST", "/api/upload-url"),
    ];

    let app = app("http://127.0.0.1:9");
    for (method, uri) in routes {
        let response = app.clone().oneshot(authed(method, uri, &user_token())).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED, "{method} {uri}");
        assert_eq!(body_json(response).await["error"], "Not implemented yet");
    }
}

#[tokio::test]
async fn test_worker_routes_need_service_role() {
    let app = app("http://127.0.0.1:9");

    let response = app.clone().oneshot(authed("POST", "/worker/summarize", &user_token())).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Insufficient permissions");

    let response = app.clone().oneshot(authed("POST", "/worker/summarize", &service_token())).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_worker_routes_authenticate_before_role_check() {
    let response = app("http://127.0.0.1:9")
        .oneshot(Request::post("/worker/gapfind").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Error envelope
// =============================================================================

#[tokio::test]
async fn test_unknown_route_envelope_echoes_request_id() {
    let request = Request::get("/nope").header("x-request-id", "req-42").body(Body::empty()).unwrap();

    let response = app("http://127.0.0.1:9").oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Not Found", "code": 404, "request": "req-42"})
    );
}

#[tokio::test]
async fn test_unknown_route_envelope_without_request_id() {
    let response = app("http://127.0.0.1:9").oneshot(get("/api/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["request"], "unknown");
}

#[tokio::test]
async fn test_wrong_method_envelope() {
    let response = app("http://127.0.0.1:9").oneshot(get("/api/search")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.headers().contains_key(header::ALLOW));
    assert_eq!(body_json(response).await["code"], 405);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_is_public() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"count": 1},
            "results": [{"id": "W1", "title": "Attention", "publication_year": 2017}]
        })))
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(post_json("/api/search", &json!({"q": "learnin to rank"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["didYouMean"], "learning to rank");
    assert_eq!(body["results"][0]["title"], "Attention");
    assert_eq!(body["results"][0]["snippet"], "Abstract not available");
}

#[tokio::test]
async fn test_search_empty_query() {
    let response = app("http://127.0.0.1:9")
        .oneshot(post_json("/api/search", &json!({"q": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Query parameter 'q' is required");
}

#[tokio::test]
async fn test_search_malformed_body() {
    let request = Request::post("/api/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app("http://127.0.0.1:9").oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid request body");
}

#[tokio::test]
async fn test_search_upstream_failure_hides_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(502).set_body_string("secret upstream detail"))
        .mount(&server)
        .await;

    let response = app(&server.uri())
        .oneshot(post_json("/api/search", &json!({"q": "anything"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"error": "Failed to search OpenAlex"}));
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let request = Request::get("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app("http://127.0.0.1:9").oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
}

#[tokio::test]
async fn test_cors_ignores_other_origin() {
    let request = Request::get("/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = app("http://127.0.0.1:9").oneshot(request).await.unwrap();
    assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_cors_wildcard_origin() {
    let app = create_router(Arc::new(state_with_origins(
        "http://127.0.0.1:9",
        vec![" * ".into(), "http://localhost:3000".into()],
    )));
    let request = Request::get("/health")
        .header(header::ORIGIN, "https://any.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
}
