//! Route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{OriginalUri, State, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

use super::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{SearchRequest, SearchResponse};

/// `POST /api/search`.
pub async fn search(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(%rejection, "Search body rejected");
        ApiError::InvalidBody
    })?;

    let outcome = state.search.run(request).await?;
    Ok(Json(outcome.into()))
}

/// Placeholder for features the worker does not serve through the gateway yet.
pub async fn not_implemented(
    user: AuthUser,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ApiError {
    tracing::info!(%method, path = %uri.path(), sub = %user.sub, "Route not implemented");
    ApiError::NotImplemented
}

/// `GET /health`: the process is up.
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gaply-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /ready`: every dependency answers.
pub async fn ready(State(state): State<Arc<AppState>>) -> Response {
    let results = futures::future::join_all(
        state.probes.iter().map(|probe| async move { (probe.name(), probe.check().await) }),
    )
    .await;

    let mut checks = Map::new();
    let mut healthy = true;
    for (name, result) in results {
        let value = match result {
            Ok(()) => Value::from("ok"),
            Err(reason) => {
                tracing::warn!(dependency = name, %reason, "Readiness check failed");
                healthy = false;
                Value::from(reason)
            }
        };
        checks.insert(name.to_string(), value);
    }

    let (status, label) =
        if healthy { (StatusCode::OK, "ready") } else { (StatusCode::SERVICE_UNAVAILABLE, "unavailable") };

    (status, Json(json!({ "status": label, "checks": checks }))).into_response()
}
