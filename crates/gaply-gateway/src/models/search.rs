//! Search request and response models for `POST /api/search`.

use serde::{Deserialize, Serialize};

use crate::config::api::DEFAULT_SEARCH_LIMIT;
use crate::error::SearchError;

/// Inbound search body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text.
    #[serde(default)]
    pub q: String,

    /// Result limit; absent or zero means the default of 50.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Result filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
}

/// Filters the frontend sends with a search.
///
/// Accepted and logged, but not forwarded to OpenAlex. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Only open-access works.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oa_only: Option<bool>,

    /// Earliest publication year (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_from: Option<i32>,

    /// Latest publication year (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_to: Option<i32>,

    /// Requested sort order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

impl SearchFilters {
    /// Whether any filter was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A validated search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Query text exactly as received.
    pub text: String,

    /// Number of results requested upstream.
    pub limit: u32,

    /// Filters (not applied upstream).
    pub filters: SearchFilters,
}

impl TryFrom<SearchRequest> for SearchQuery {
    type Error = SearchError;

    fn try_from(request: SearchRequest) -> Result<Self, Self::Error> {
        if request.q.trim().is_empty() {
            return Err(SearchError::validation("q", "Query parameter 'q' is required"));
        }

        Ok(Self {
            text: request.q,
            limit: request.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_SEARCH_LIMIT),
            filters: request.filters.unwrap_or_default(),
        })
    }
}

/// One search hit as returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// OpenAlex work ID.
    pub id: String,

    /// Title.
    pub title: String,

    /// Author display names in byline order.
    pub authors: Vec<String>,

    /// Publication year, 0 when unknown.
    pub year: i32,

    /// DOI, empty when unknown.
    pub doi: String,

    /// Open-access flag from Unpaywall.
    pub oa: bool,

    /// Publisher or OA landing page.
    pub publisher_url: String,

    /// Whether the work is a thesis.
    pub is_thesis: bool,

    /// Approximate abstract excerpt.
    pub snippet: String,

    /// Whether the paper is already in the local store.
    pub ingested: bool,

    /// Relevance score.
    pub score: f64,
}

/// Search response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Results in upstream order.
    pub results: Vec<SearchResult>,

    /// Spelling suggestion.
    #[serde(rename = "didYouMean", default, skip_serializing_if = "Option::is_none")]
    pub did_you_mean: Option<String>,

    /// Number of results returned.
    pub total: usize,
}
