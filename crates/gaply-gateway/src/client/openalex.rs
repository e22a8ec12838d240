//! OpenAlex `/works` search.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use super::{build_http_client, read_json};
use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::WorksPage;
use crate::search::WorkSource;

/// OpenAlex API client.
#[derive(Clone)]
pub struct OpenAlexClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAlexClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        Ok(Self {
            client: build_http_client(
                config.search_timeout,
                config.connect_timeout,
                Some(api::USER_AGENT),
            )?,
            base_url: config.openalex_base_url.trim_end_matches('/').to_string(),
            timeout: config.search_timeout,
        })
    }

    /// Search works by free text.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status or an
    /// undecodable body.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn search_works(&self, query: &str, limit: u32) -> ClientResult<WorksPage> {
        let url = format!("{}/works", self.base_url);
        let per_page = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("search", query), ("per_page", per_page.as_str())])
            .send()
            .await
            .map_err(|e| ClientError::transport(e, self.timeout))?;

        read_json(response, self.timeout).await
    }
}

#[async_trait]
impl WorkSource for OpenAlexClient {
    async fn search_works(&self, query: &str, limit: u32) -> ClientResult<WorksPage> {
        Self::search_works(self, query, limit).await
    }
}

impl std::fmt::Debug for OpenAlexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAlexClient").field("base_url", &self.base_url).finish()
    }
}
