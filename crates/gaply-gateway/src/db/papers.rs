//! `papers` and `chunks` tables.

use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use super::{Database, StoreError};
use crate::models::{Chunk, NewChunk, NewPaper, Paper, ProcessingStatus};

impl Database {
    /// Insert a paper.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate DOI (see [`StoreError::is_unique_violation`]) or
    /// any database error.
    #[instrument(skip(self, paper), fields(doi = %paper.doi))]
    pub async fn create_paper(&self, paper: &NewPaper) -> Result<Paper, StoreError> {
        let row = sqlx::query_as::<_, Paper>(
            r"
            INSERT INTO papers (doi, title, authors, year, oa_pdf_url, storage_path, ingest_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            ",
        )
        .bind(&paper.doi)
        .bind(&paper.title)
        .bind(Json(&paper.authors))
        .bind(paper.year)
        .bind(&paper.oa_pdf_url)
        .bind(&paper.storage_path)
        .bind(paper.ingest_status.as_str())
        .fetch_one(self.pool())
        .await?;

        Ok(row)
    }

    /// Fetch a paper by ID.
    ///
    /// # Errors
    ///
    /// Returns error on database failure.
    #[instrument(skip(self))]
    pub async fn paper_by_id(&self, id: Uuid) -> Result<Option<Paper>, StoreError> {
        let row = sqlx::query_as::<_, Paper>("SELECT * FROM papers WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    /// Fetch a paper by exact DOI.
    ///
    /// # Errors
    ///
    /// Returns error on database failure.
    #[instrument(skip(self))]
    pub async fn paper_by_doi(&self, doi: &str) -> Result<Option<Paper>, StoreError> {
        let row = sqlx::query_as::<_, Paper>("SELECT * FROM papers WHERE doi = $1")
            .bind(doi)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    /// Set a paper's ingest status. Completing stamps `ingested_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no paper has this ID.
    #[instrument(skip(self))]
    pub async fn update_paper_status(
        &self,
        id: Uuid,
        status: ProcessingStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            UPDATE papers
            SET ingest_status = $1,
                ingested_at = CASE WHEN $1 = 'completed' THEN NOW() ELSE ingested_at END,
                updated_at = NOW()
            WHERE id = $2
            ",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("paper", id));
        }
        Ok(())
    }

    /// Insert a chunk.
    ///
    /// # Errors
    ///
    /// Returns error on database failure, including an unknown paper ID.
    #[instrument(skip(self, chunk), fields(chunk_id = %chunk.chunk_id))]
    pub async fn create_chunk(&self, chunk: &NewChunk) -> Result<Chunk, StoreError> {
        let row = sqlx::query_as::<_, Chunk>(
            r"
            INSERT INTO chunks (chunk_id, paper_id, page, paragraph_index, sentence_index, text)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(&chunk.chunk_id)
        .bind(chunk.paper_id)
        .bind(chunk.page)
        .bind(chunk.paragraph_index)
        .bind(chunk.sentence_index)
        .bind(&chunk.text)
        .fetch_one(self.pool())
        .await?;

        Ok(row)
    }

    /// All chunks of a paper in reading order.
    ///
    /// # Errors
    ///
    /// Returns error on database failure.
    #[instrument(skip(self))]
    pub async fn chunks_by_paper(&self, paper_id: Uuid) -> Result<Vec<Chunk>, StoreError> {
        let rows = sqlx::query_as::<_, Chunk>(
            r"
            SELECT * FROM chunks
            WHERE paper_id = $1
            ORDER BY page, paragraph_index, sentence_index
            ",
        )
        .bind(paper_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }
}
