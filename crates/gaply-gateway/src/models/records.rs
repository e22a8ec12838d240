//! Rows of the relational schema (papers, chunks, jobs, gaps, edits).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::{GapEvidence, SummaryItem, TextLocation};

/// Lifecycle of an ingest or background job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    /// Database and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether no further transitions are expected.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string the schema does not know.
#[derive(thiserror::Error, Debug)]
#[error("unknown processing status: {0}")]
pub struct UnknownStatus(pub String);

impl TryFrom<String> for ProcessingStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(UnknownStatus(value)),
        }
    }
}

/// A research paper known to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Paper {
    pub id: Uuid,
    pub doi: String,
    pub title: String,
    pub authors: Json<Vec<String>>,
    pub year: i32,
    pub oa_pdf_url: Option<String>,
    pub storage_path: Option<String>,
    pub ingested_at: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub ingest_status: ProcessingStatus,
    pub summary: Option<Json<Vec<SummaryItem>>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a paper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPaper {
    pub doi: String,
    pub title: String,
    pub authors: Vec<String>,
    pub year: i32,
    pub oa_pdf_url: Option<String>,
    pub storage_path: Option<String>,
    pub ingest_status: ProcessingStatus,
}

/// A sentence-level chunk of an ingested paper.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chunk {
    pub chunk_id: String,
    pub paper_id: Uuid,
    pub page: i32,
    pub paragraph_index: i32,
    pub sentence_index: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChunk {
    pub chunk_id: String,
    pub paper_id: Uuid,
    pub page: i32,
    pub paragraph_index: i32,
    pub sentence_index: i32,
    pub text: String,
}

/// A background job tracked for the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub job_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub job_type: String,
    #[sqlx(try_from = "String")]
    pub status: ProcessingStatus,
    pub progress: i32,
    pub result: Option<Json<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewJob {
    pub job_type: String,
    pub status: ProcessingStatus,
    pub progress: i32,
    pub result: Option<serde_json::Value>,
}

/// A research gap persisted from the worker's findings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Gap {
    pub id: Uuid,
    pub paper_ids: Json<Vec<Uuid>>,
    pub statement: String,
    pub evidence: Json<Vec<GapEvidence>>,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a gap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewGap {
    pub paper_ids: Vec<Uuid>,
    pub statement: String,
    pub evidence: Vec<GapEvidence>,
    pub score: f64,
}

/// A user's edit to a paper's text.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Edit {
    pub id: Uuid,
    pub paper_id: Uuid,
    pub user_id: Uuid,
    pub location: Json<TextLocation>,
    pub old_text: String,
    pub new_text: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating an edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEdit {
    pub paper_id: Uuid,
    pub user_id: Uuid,
    pub location: TextLocation,
    pub old_text: String,
    pub new_text: String,
}
