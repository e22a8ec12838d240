//! `jobs` table.

use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use super::{Database, StoreError};
use crate::models::{Job, NewJob, ProcessingStatus};

impl Database {
    /// Insert a job.
    ///
    /// # Errors
    ///
    /// Returns error on database failure.
    #[instrument(skip(self, job), fields(job_type = %job.job_type))]
    pub async fn create_job(&self, job: &NewJob) -> Result<Job, StoreError> {
        let row = sqlx::query_as::<_, Job>(
            r"
            INSERT INTO jobs (type, status, progress, result)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(&job.job_type)
        .bind(job.status.as_str())
        .bind(job.progress)
        .bind(job.result.as_ref().map(Json))
        .fetch_one(self.pool())
        .await?;

        Ok(row)
    }

    /// Fetch a job by ID.
    ///
    /// # Errors
    ///
    /// Returns error on database failure.
    #[instrument(skip(self))]
    pub async fn job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    /// Replace a job's status, progress and result.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no job has this ID.
    #[instrument(skip(self, result))]
    pub async fn update_job_status(
        &self,
        job_id: Uuid,
        status: ProcessingStatus,
        progress: i32,
        result: Option<&serde_json::Value>,
    ) -> Result<(), StoreError> {
        let outcome = sqlx::query(
            r"
            UPDATE jobs
            SET status = $1, progress = $2, result = $3, updated_at = NOW()
            WHERE job_id = $4
            ",
        )
        .bind(status.as_str())
        .bind(progress)
        .bind(result.map(Json))
        .bind(job_id)
        .execute(self.pool())
        .await?;

        if outcome.rows_affected() == 0 {
            return Err(StoreError::not_found("job", job_id));
        }
        Ok(())
    }
}
