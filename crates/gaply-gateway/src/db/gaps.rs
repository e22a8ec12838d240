//! `gaps` table.

use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use super::{Database, StoreError};
use crate::models::{Gap, NewGap};

impl Database {
    /// Insert a research gap.
    ///
    /// # Errors
    ///
    /// Returns error on database failure.
    #[instrument(skip(self, gap), fields(papers = gap.paper_ids.len()))]
    pub async fn create_gap(&self, gap: &NewGap) -> Result<Gap, StoreError> {
        let row = sqlx::query_as::<_, Gap>(
            r"
            INSERT INTO gaps (paper_ids, statement, evidence, score)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(Json(&gap.paper_ids))
        .bind(&gap.statement)
        .bind(Json(&gap.evidence))
        .bind(gap.score)
        .fetch_one(self.pool())
        .await?;

        Ok(row)
    }

    /// Gaps whose paper set contains every given paper, best score first.
    ///
    /// # Errors
    ///
    /// Returns error on database failure.
    #[instrument(skip(self, paper_ids), fields(papers = paper_ids.len()))]
    pub async fn gaps_by_papers(&self, paper_ids: &[Uuid]) -> Result<Vec<Gap>, StoreError> {
        let rows = sqlx::query_as::<_, Gap>(
            "SELECT * FROM gaps WHERE paper_ids @> $1 ORDER BY score DESC",
        )
        .bind(Json(paper_ids))
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }
}
