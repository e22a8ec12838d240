//! Router assembly.
//!
//! - `/health`, `/ready` and `POST /api/search` are public
//! - every other `/api/*` route needs a valid bearer token
//! - `/worker/*` additionally needs the service role

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::envelope::{self, REQUEST_ID_HEADER};
use super::handlers;
use super::AppState;
use crate::auth::{RequiredRole, SERVICE_ROLE, require_auth, require_role};

/// Build the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    let protected = Router::new()
        .route("/paper/{id}", get(handlers::not_implemented))
        .route("/paper/{id}/evidence", get(handlers::not_implemented))
        .route("/paper/{id}/patch", put(handlers::not_implemented))
        .route("/ingest", post(handlers::not_implemented))
        .route("/ingest/{job_id}", get(handlers::not_implemented))
        .route("/paraphrase", post(handlers::not_implemented))
        .route("/proofread", post(handlers::not_implemented))
        .route("/journal-check", post(handlers::not_implemented))
        .route("/upload-url", post(handlers::not_implemented))
        .route_layer(from_fn_with_state(state.jwt.clone(), require_auth));

    let api = Router::new().route("/search", post(handlers::search)).merge(protected);

    // Layers run bottom-up: authentication first, then the role check.
    let worker = Router::new()
        .route("/ingest", post(handlers::not_implemented))
        .route("/paraphrase", post(handlers::not_implemented))
        .route("/summarize", post(handlers::not_implemented))
        .route("/proofread", post(handlers::not_implemented))
        .route("/gapfind", post(handlers::not_implemented))
        .route("/journal-check", post(handlers::not_implemented))
        .route("/search-chunks", post(handlers::not_implemented))
        .route_layer(from_fn_with_state(RequiredRole(SERVICE_ROLE), require_role))
        .route_layer(from_fn_with_state(state.jwt.clone(), require_auth));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .nest("/api", api)
        .nest("/worker", worker)
        .layer(CatchPanicLayer::custom(envelope::panic_response))
        .layer(from_fn(envelope::uniform_errors))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the CORS layer. A `*` entry allows any origin and disables credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ]);

    let trimmed: Vec<&str> =
        origins.iter().map(|origin| origin.trim()).filter(|origin| !origin.is_empty()).collect();

    if trimmed.contains(&"*") {
        tracing::warn!("CORS allows any origin; credentials are disabled");
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = trimmed
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins)).allow_credentials(true)
}
