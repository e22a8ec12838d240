//! Client for the compute worker (ingestion, paraphrasing, proofreading, ...).
//!
//! Every operation is a JSON POST under `/worker/`. Calls can run for minutes,
//! so the client uses the long worker timeout.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::{build_http_client, handle_response, read_json};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    GapFindRequest, GapFindResponse, IngestRequest, IngestResponse, JournalCheckRequest,
    JournalCheckResponse, ParaphraseRequest, ParaphraseResponse, ProofreadRequest,
    ProofreadResponse, SummarizeRequest, SummarizeResponse,
};

/// A worker call failed.
#[derive(thiserror::Error, Debug)]
#[error("worker {endpoint} failed: {source}")]
pub struct WorkerError {
    /// Worker path that was called.
    pub endpoint: &'static str,
    /// Underlying failure.
    #[source]
    pub source: ClientError,
}

impl WorkerError {
    /// HTTP status returned by the worker, if it answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.source.status()
    }
}

/// Compute worker client.
#[derive(Clone)]
pub struct WorkerClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl WorkerClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        Ok(Self {
            client: build_http_client(config.worker_timeout, config.connect_timeout, None)?,
            base_url: config.worker_url.trim_end_matches('/').to_string(),
            timeout: config.worker_timeout,
        })
    }

    /// Base URL of the worker.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ingest a paper from storage or by DOI.
    pub async fn ingest(&self, request: &IngestRequest) -> Result<IngestResponse, WorkerError> {
        self.post("/worker/ingest", request).await
    }

    /// Paraphrase text.
    pub async fn paraphrase(
        &self,
        request: &ParaphraseRequest,
    ) -> Result<ParaphraseResponse, WorkerError> {
        self.post("/worker/paraphrase", request).await
    }

    /// Summarize a stored paper.
    pub async fn summarize(
        &self,
        request: &SummarizeRequest,
    ) -> Result<SummarizeResponse, WorkerError> {
        self.post("/worker/summarize", request).await
    }

    /// Proofread text or a stored paper.
    pub async fn proofread(
        &self,
        request: &ProofreadRequest,
    ) -> Result<ProofreadResponse, WorkerError> {
        self.post("/worker/proofread", request).await
    }

    /// Find research gaps across papers.
    pub async fn find_gaps(&self, request: &GapFindRequest) -> Result<GapFindResponse, WorkerError> {
        self.post("/worker/gapfind", request).await
    }

    /// Check a paper against a journal's guidelines.
    pub async fn check_journal(
        &self,
        request: &JournalCheckRequest,
    ) -> Result<JournalCheckResponse, WorkerError> {
        self.post("/worker/journal-check", request).await
    }

    /// Check that the worker answers `GET /health` with a 2xx status.
    pub async fn health_check(&self) -> Result<(), WorkerError> {
        const ENDPOINT: &str = "/health";
        let wrap = |source| WorkerError { endpoint: ENDPOINT, source };

        let response = self
            .client
            .get(format!("{}{ENDPOINT}", self.base_url))
            .send()
            .await
            .map_err(|e| wrap(ClientError::transport(e, self.timeout)))?;

        handle_response(response).await.map(drop).map_err(wrap)
    }

    #[instrument(skip(self, body), fields(base_url = %self.base_url))]
    async fn post<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, WorkerError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let wrap = |source| WorkerError { endpoint, source };

        let response = self
            .client
            .post(format!("{}{endpoint}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| wrap(ClientError::transport(e, self.timeout)))?;

        debug!(status = response.status().as_u16(), "Worker responded");
        read_json(response, self.timeout).await.map_err(wrap)
    }
}

impl std::fmt::Debug for WorkerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerClient").field("base_url", &self.base_url).finish()
    }
}
