//! Search pipeline behind `POST /api/search`.
//!
//! One OpenAlex query, then per-result enrichment:
//! - open-access status from Unpaywall
//! - ingestion status from the local paper store
//!
//! Enrichment failures never fail the request. They are recorded per result in
//! [`EnrichmentStatus`] and the result keeps its defaults (`oa = false`,
//! `ingested = false`). Only the metadata search itself is fatal.

mod snippet;
mod suggest;

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use tracing::{debug, info, instrument};

pub use snippet::{MAX_CHARS, MAX_WORDS, MISSING_ABSTRACT, generate_snippet};
pub use suggest::did_you_mean;

use crate::config::api::DEFAULT_ENRICH_CONCURRENCY;
use crate::db::StoreError;
use crate::error::{ClientResult, SearchError};
use crate::models::{
    ExternalWork, OpenAccessInfo, SearchQuery, SearchRequest, SearchResponse, SearchResult,
    WorksPage,
};

/// Relevance score assigned to every result.
pub const DEFAULT_SCORE: f64 = 0.9;

/// Full-text work search (OpenAlex).
#[async_trait]
pub trait WorkSource: Send + Sync {
    /// Search works by free text, returning at most `limit` results.
    async fn search_works(&self, query: &str, limit: u32) -> ClientResult<WorksPage>;
}

/// Open-access lookup by DOI (Unpaywall).
#[async_trait]
pub trait OpenAccessSource: Send + Sync {
    /// Fetch the open-access record for a DOI.
    async fn lookup(&self, doi: &str) -> ClientResult<OpenAccessInfo>;
}

/// Local paper store, queried for ingestion status.
#[async_trait]
pub trait PaperIndex: Send + Sync {
    /// Whether a paper with this DOI is stored.
    async fn paper_exists(&self, doi: &str) -> Result<bool, StoreError>;
}

/// How one enrichment step ended for a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// The lookup succeeded and its data was applied.
    Applied,
    /// The result has no DOI, so nothing was looked up.
    Skipped,
    /// The lookup failed; the result kept its default.
    Failed(String),
}

impl StepStatus {
    /// Whether the step failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Per-result record of the enrichment steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentStatus {
    pub open_access: StepStatus,
    pub ingestion: StepStatus,
}

impl EnrichmentStatus {
    const fn skipped() -> Self {
        Self { open_access: StepStatus::Skipped, ingestion: StepStatus::Skipped }
    }
}

/// A result together with how its enrichment went.
#[derive(Debug, Clone)]
pub struct EnrichedResult {
    pub result: SearchResult,
    pub status: EnrichmentStatus,
}

/// Pipeline output before it is rendered as a [`SearchResponse`].
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Results in upstream order.
    pub results: Vec<EnrichedResult>,

    /// Spelling suggestion for the query.
    pub did_you_mean: Option<String>,
}

impl SearchOutcome {
    /// Number of results.
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of results with at least one failed enrichment step.
    #[must_use]
    pub fn degraded(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status.open_access.is_failed() || r.status.ingestion.is_failed())
            .count()
    }
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        let total = outcome.total();
        Self {
            results: outcome.results.into_iter().map(|r| r.result).collect(),
            did_you_mean: outcome.did_you_mean,
            total,
        }
    }
}

/// Search orchestration over injected sources.
#[derive(Clone)]
pub struct SearchPipeline {
    works: Arc<dyn WorkSource>,
    open_access: Arc<dyn OpenAccessSource>,
    papers: Arc<dyn PaperIndex>,
    concurrency: usize,
}

impl SearchPipeline {
    /// Create a pipeline with the default enrichment concurrency.
    #[must_use]
    pub fn new(
        works: Arc<dyn WorkSource>,
        open_access: Arc<dyn OpenAccessSource>,
        papers: Arc<dyn PaperIndex>,
    ) -> Self {
        Self { works, open_access, papers, concurrency: DEFAULT_ENRICH_CONCURRENCY }
    }

    /// Set how many results are enriched at once. 1 enriches strictly in order.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run a search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] for an empty query (no outbound call
    /// is made) and [`SearchError::Upstream`] when the work search fails.
    #[instrument(skip_all, fields(query = %request.q))]
    pub async fn run(&self, request: SearchRequest) -> Result<SearchOutcome, SearchError> {
        let query = SearchQuery::try_from(request)?;

        if !query.filters.is_empty() {
            debug!(filters = ?query.filters, "Search filters received; not applied upstream");
        }

        let page =
            self.works.search_works(&query.text, query.limit).await.map_err(SearchError::Upstream)?;
        info!(
            returned = page.results.len(),
            upstream_total = page.meta.count,
            "Work search completed"
        );

        // `buffered` keeps upstream order regardless of completion order.
        let results: Vec<EnrichedResult> = stream::iter(page.results)
            .map(|work| self.enrich(project(work)))
            .buffered(self.concurrency)
            .collect()
            .await;

        let outcome = SearchOutcome { results, did_you_mean: did_you_mean(&query.text) };
        debug!(total = outcome.total(), degraded = outcome.degraded(), "Search enriched");
        Ok(outcome)
    }

    async fn enrich(&self, mut result: SearchResult) -> EnrichedResult {
        if result.doi.is_empty() {
            return EnrichedResult { result, status: EnrichmentStatus::skipped() };
        }

        let open_access = match self.open_access.lookup(&result.doi).await {
            Ok(info) => {
                result.oa = info.is_oa;
                if let Some(url) = info.best_url().filter(|_| info.is_oa) {
                    result.publisher_url = url.to_string();
                }
                StepStatus::Applied
            }
            Err(err) => {
                debug!(doi = %result.doi, error = %err, "Open-access lookup failed");
                result.oa = false;
                StepStatus::Failed(err.to_string())
            }
        };

        let ingestion = match self.papers.paper_exists(&result.doi).await {
            Ok(exists) => {
                result.ingested = exists;
                StepStatus::Applied
            }
            Err(err) => {
                debug!(doi = %result.doi, error = %err, "Ingestion lookup failed");
                result.ingested = false;
                StepStatus::Failed(err.to_string())
            }
        };

        EnrichedResult { result, status: EnrichmentStatus { open_access, ingestion } }
    }
}

impl std::fmt::Debug for SearchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPipeline").field("concurrency", &self.concurrency).finish()
    }
}

/// Map an upstream work onto a result with enrichment defaults.
#[must_use]
pub fn project(work: ExternalWork) -> SearchResult {
    SearchResult {
        authors: work.author_names(),
        is_thesis: work.is_thesis(),
        snippet: generate_snippet(work.abstract_inverted_index.as_ref()),
        publisher_url: work.landing_url().unwrap_or_default().to_string(),
        year: work.publication_year.unwrap_or(0),
        doi: work.doi().unwrap_or_default().to_string(),
        title: work.title.unwrap_or_default(),
        id: work.id,
        oa: false,
        ingested: false,
        score: DEFAULT_SCORE,
    }
}
