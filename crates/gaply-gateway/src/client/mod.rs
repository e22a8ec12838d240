//! Outbound HTTP clients.
//!
//! One pooled `reqwest::Client` per upstream service:
//! - [`OpenAlexClient`] for work search
//! - [`UnpaywallClient`] for open-access lookups
//! - [`WorkerClient`] for the compute worker
//!
//! No retries, no caching. A failed call is reported once to the caller.

mod openalex;
mod unpaywall;
mod worker;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

pub use openalex::OpenAlexClient;
pub use unpaywall::{UnpaywallClient, normalize_doi};
pub use worker::{WorkerClient, WorkerError};

use crate::config::api;
use crate::error::{ClientError, ClientResult};

/// Build a pooled HTTP client with the shared defaults.
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialised.
pub(crate) fn build_http_client(
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<&'static str>,
) -> ClientResult<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true);

    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent);
    }

    Ok(builder.build()?)
}

/// Map non-success statuses onto [`ClientError`].
pub(crate) async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    match status.as_u16() {
        404 => Err(ClientError::not_found(text)),
        400 => Err(ClientError::bad_request(text)),
        500..=599 => Err(ClientError::server(status.as_u16(), text)),
        _ => Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text }),
    }
}

/// Check the status, then decode the body as JSON.
pub(crate) async fn read_json<T>(response: reqwest::Response, timeout: Duration) -> ClientResult<T>
where
    T: DeserializeOwned,
{
    let response = handle_response(response).await?;
    let bytes = response.bytes().await.map_err(|e| ClientError::transport(e, timeout))?;
    serde_json::from_slice(&bytes).map_err(ClientError::from)
}
