//! Uniform JSON bodies for failures no handler rendered.
//!
//! Unknown routes, unsupported methods and handler panics leave the router
//! without a JSON body. [`uniform_errors`] rewrites those into
//! `{ "error", "code", "request" }`, echoing the caller's `X-Request-ID`.

use std::any::Any;

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Header carrying the caller's request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Placeholder when the caller sent no request ID.
pub const UNKNOWN_REQUEST: &str = "unknown";

/// Body of an envelope error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub code: u16,
    pub request: String,
}

impl ErrorEnvelope {
    /// Envelope for a status, using its canonical reason as the message.
    #[must_use]
    pub fn for_status(status: StatusCode, request: impl Into<String>) -> Self {
        Self {
            error: status.canonical_reason().unwrap_or("Internal Server Error").to_string(),
            code: status.as_u16(),
            request: request.into(),
        }
    }
}

/// Middleware rewriting bodiless error responses into an [`ErrorEnvelope`].
///
/// Responses that already carry JSON (handler errors) pass through untouched.
pub async fn uniform_errors(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_REQUEST)
        .to_string();

    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    tracing::debug!(status = status.as_u16(), request = %request_id, "Unhandled error response");
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = (status, Json(ErrorEnvelope::for_status(status, request_id))).into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}

/// Turn a caught panic into a bare 500 for [`uniform_errors`] to wrap.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v == HeaderValue::from_static("application/json"))
}
