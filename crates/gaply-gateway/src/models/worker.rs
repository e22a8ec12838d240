//! Request and response schemas of the compute worker protocol.
//!
//! Field names follow the worker's JSON exactly, which mixes snake_case and
//! camelCase.

use serde::{Deserialize, Serialize};

/// `POST /worker/ingest` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Path of an uploaded PDF in object storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,

    /// DOI to fetch instead of an upload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// URL the worker calls when ingestion completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_callback: Option<String>,
}

/// `POST /worker/ingest` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    /// ID of the ingested paper.
    pub paper_id: String,
    /// Number of chunks written.
    #[serde(default)]
    pub chunk_count: u32,
    /// Short summary.
    #[serde(default)]
    pub summary: String,
    /// Ingestion status.
    #[serde(default)]
    pub status: String,
}

/// Spelling variant for paraphrasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnglishVariant {
    /// American English.
    #[default]
    Us,
    /// British English.
    Uk,
}

/// `POST /worker/paraphrase` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParaphraseRequest {
    /// Text to paraphrase.
    pub text: String,
    /// Spelling variant.
    #[serde(default)]
    pub variant: EnglishVariant,
    /// Formality from 1 (casual) to 5 (formal).
    pub tone: u8,
    /// Number of alternatives requested.
    pub alternatives: u8,
    /// Disable AI-assisted rewriting.
    #[serde(default)]
    pub no_ai: bool,
}

/// `POST /worker/paraphrase` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParaphraseResponse {
    /// Paraphrased alternatives.
    #[serde(default)]
    pub alternatives: Vec<ParaphraseAlternative>,
    /// Worker warnings.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// One paraphrased alternative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParaphraseAlternative {
    /// Alternative ID.
    pub id: String,
    /// Rewritten text.
    pub text: String,
    /// Grammar score.
    #[serde(rename = "grammarScore", default)]
    pub grammar_score: f64,
    /// Notes.
    #[serde(default)]
    pub notes: String,
    /// Whether an AI model produced this alternative.
    #[serde(default)]
    pub is_ai_assisted: bool,
}

/// `POST /worker/summarize` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeRequest {
    /// Paper to summarize.
    #[serde(rename = "paperId")]
    pub paper_id: String,
    /// Scope (e.g., "full", "section").
    pub scope: String,
    /// Granularity (e.g., "paragraph", "sentence").
    pub granularity: String,
}

/// `POST /worker/summarize` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeResponse {
    /// Summary items.
    #[serde(default)]
    pub summary: Vec<SummaryItem>,
}

/// A summary sentence with its sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryItem {
    /// Summary text.
    pub text: String,
    /// Where the text came from.
    #[serde(default)]
    pub provenance: Vec<Provenance>,
}

/// Source of a summary sentence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provenance {
    /// Chunk ID.
    pub chunk_id: String,
    /// DOI of the source paper.
    #[serde(default)]
    pub doi: String,
    /// Page number.
    #[serde(default)]
    pub page: i32,
    /// Paragraph index.
    #[serde(default)]
    pub paragraph_index: i32,
    /// Sentence index.
    #[serde(default)]
    pub sentence_index: i32,
    /// Quoted source text.
    #[serde(default)]
    pub quote: String,
}

/// `POST /worker/proofread` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofreadRequest {
    /// Raw text to check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Stored paper to check.
    #[serde(rename = "paperId", default, skip_serializing_if = "Option::is_none")]
    pub paper_id: Option<String>,
    /// Checks to run.
    #[serde(default)]
    pub checks: Vec<ProofreadCheck>,
}

/// A proofreading check category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofreadCheck {
    /// Grammar and spelling.
    Grammar,
    /// Argument coherence.
    Coherence,
    /// Repeated content.
    Redundancy,
    /// Citation problems.
    References,
    /// Likely machine-generated text.
    AiSuspicion,
}

impl ProofreadCheck {
    /// Every check, the worker's default set.
    pub const ALL: [Self; 5] =
        [Self::Grammar, Self::Coherence, Self::Redundancy, Self::References, Self::AiSuspicion];
}

/// `POST /worker/proofread` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofreadResponse {
    /// Issues found.
    #[serde(default)]
    pub issues: Vec<ProofreadIssue>,
    /// Issue counts per category.
    #[serde(default)]
    pub summary: ProofreadSummary,
}

/// One proofreading issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofreadIssue {
    /// Issue ID.
    pub id: String,
    /// Category.
    pub category: String,
    /// "low", "medium" or "high".
    pub severity: String,
    /// Where the issue occurs.
    #[serde(default)]
    pub location: TextLocation,
    /// Original text.
    #[serde(default)]
    pub original: String,
    /// Suggested replacement.
    #[serde(default)]
    pub suggestion: String,
    /// Explanation.
    #[serde(default)]
    pub explanation: String,
    /// Confidence in [0, 1].
    #[serde(default)]
    pub confidence: f64,
}

/// Position inside a paper, shared by proofreading issues and edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLocation {
    /// Paper ID.
    #[serde(rename = "paperId", default, skip_serializing_if = "Option::is_none")]
    pub paper_id: Option<String>,
    /// Page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i32>,
    /// Paragraph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub para: Option<i32>,
    /// Sentence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent: Option<i32>,
}

/// Issue counts per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofreadSummary {
    pub grammar: u32,
    pub coherence: u32,
    pub redundancy: u32,
    pub references: u32,
    pub ai_suspicion: u32,
}

/// `POST /worker/gapfind` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapFindRequest {
    /// Papers to analyse.
    pub paper_ids: Vec<String>,
    /// Research topic.
    pub topic: String,
    /// How many years back to consider.
    pub years_window: u32,
}

/// `POST /worker/gapfind` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GapFindResponse {
    /// Gaps found.
    #[serde(default)]
    pub gaps: Vec<GapFinding>,
}

/// A research gap reported by the worker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GapFinding {
    /// Gap ID.
    pub id: String,
    /// Gap statement.
    pub statement: String,
    /// Score.
    #[serde(default)]
    pub score: f64,
    /// Supporting papers.
    #[serde(default)]
    pub evidence: Vec<GapEvidence>,
    /// Rationale.
    #[serde(default)]
    pub rationale: String,
}

/// A paper supporting a gap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapEvidence {
    /// Paper ID.
    #[serde(rename = "paperId")]
    pub paper_id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// DOI.
    #[serde(default)]
    pub doi: String,
}

/// `POST /worker/journal-check` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalCheckRequest {
    /// Stored paper to check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_id: Option<String>,
    /// Raw text to check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Target journal name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_name: Option<String>,
    /// Target journal guidelines URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_url: Option<String>,
}

/// `POST /worker/journal-check` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalCheckResponse {
    /// Compliance checklist.
    #[serde(default)]
    pub checklist: Vec<JournalCheckItem>,
    /// Suggestions.
    #[serde(default)]
    pub suggestions: Vec<JournalSuggestion>,
}

/// A checklist entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalCheckItem {
    pub item: String,
    pub status: String,
    #[serde(default)]
    pub detail: String,
}

/// A suggested change for journal compliance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalSuggestion {
    pub text: String,
    #[serde(default)]
    pub is_ai_assisted: bool,
}
