//! Error types for the Gaply gateway.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Layer-specific errors live next to their layer (`db::StoreError`,
//! `storage::StorageError`, `auth::AuthError`, `client::worker::WorkerError`);
//! this module holds the outbound HTTP error, the search error and the
//! HTTP-facing [`ApiError`].

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors from outbound HTTP clients.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from upstream
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// A setting the call depends on is absent.
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Classify a transport error, surfacing timeouts separately.
    #[must_use]
    pub fn transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() { Self::Timeout(timeout) } else { Self::Http(err) }
    }

    /// HTTP status reported by upstream, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::BadRequest { .. } => Some(400),
            Self::Server { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the search pipeline.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// The request failed validation before any outbound call.
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: &'static str,
        /// Validation error message
        message: String,
    },

    /// The metadata search failed; the whole request fails with it.
    #[error("Metadata search failed: {0}")]
    Upstream(#[source] ClientError),
}

impl SearchError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }
}

/// Errors rendered to HTTP clients as `{ "error": ... }`.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Body could not be decoded.
    #[error("Invalid request body")]
    InvalidBody,

    /// Search pipeline failure.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Placeholder route.
    #[error("Not implemented yet")]
    NotImplemented,
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody | Self::Search(SearchError::Validation { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Search(SearchError::Upstream(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Message shown to the caller. Upstream details stay in the logs.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Search(SearchError::Validation { message, .. }) => message.clone(),
            Self::Search(SearchError::Upstream(_)) => "Failed to search OpenAlex".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": self.to_user_message() }))).into_response()
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
