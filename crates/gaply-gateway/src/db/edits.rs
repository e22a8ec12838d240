//! `edits` table.

use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use super::{Database, StoreError};
use crate::models::{Edit, NewEdit};

impl Database {
    /// Record an edit.
    ///
    /// # Errors
    ///
    /// Returns error on database failure, including an unknown paper ID.
    #[instrument(skip(self, edit), fields(paper_id = %edit.paper_id))]
    pub async fn create_edit(&self, edit: &NewEdit) -> Result<Edit, StoreError> {
        let row = sqlx::query_as::<_, Edit>(
            r"
            INSERT INTO edits (paper_id, user_id, location, old_text, new_text)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(edit.paper_id)
        .bind(edit.user_id)
        .bind(Json(&edit.location))
        .bind(&edit.old_text)
        .bind(&edit.new_text)
        .fetch_one(self.pool())
        .await?;

        Ok(row)
    }

    /// Edits of a paper, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error on database failure.
    #[instrument(skip(self))]
    pub async fn edits_by_paper(&self, paper_id: Uuid) -> Result<Vec<Edit>, StoreError> {
        let rows = sqlx::query_as::<_, Edit>(
            "SELECT * FROM edits WHERE paper_id = $1 ORDER BY created_at",
        )
        .bind(paper_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }
}
