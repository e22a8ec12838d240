//! Data models for the gateway.
//!
//! Upstream payloads (`work`) use `#[serde(default)]` throughout so partial
//! records still decode. Worker and frontend payloads keep their own field
//! naming via explicit renames.

mod records;
mod search;
mod work;
mod worker;

pub use records::{
    Chunk, Edit, Gap, Job, NewChunk, NewEdit, NewGap, NewJob, NewPaper, Paper, ProcessingStatus,
    UnknownStatus,
};
pub use search::{SearchFilters, SearchQuery, SearchRequest, SearchResponse, SearchResult};
pub use work::{
    AuthorName, Authorship, ExternalWork, HostVenue, InvertedAbstract, OaLocation, OpenAccessInfo,
    PrimaryLocation, WorksMeta, WorksPage,
};
pub use worker::{
    EnglishVariant, GapEvidence, GapFindRequest, GapFindResponse, GapFinding, IngestRequest,
    IngestResponse, JournalCheckItem, JournalCheckRequest, JournalCheckResponse,
    JournalSuggestion, ParaphraseAlternative, ParaphraseRequest, ParaphraseResponse,
    ProofreadCheck, ProofreadIssue, ProofreadRequest, ProofreadResponse, ProofreadSummary,
    Provenance, SummarizeRequest, SummarizeResponse, SummaryItem, TextLocation,
};
