use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ThumbnailJob, ThumbnailQueue};
use crate::core::error::{AppError, Result};

/// Thumbnail queue backed by the `thumbnail_jobs` table
pub struct PgThumbnailQueue {
    pool: PgPool,
}

impl PgThumbnailQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ThumbnailQueue for PgThumbnailQueue {
    async fn enqueue(&self, job: ThumbnailJob) -> Result<()> {
        let job_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO thumbnail_jobs (id, user_id, file_id, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING id
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(job.user_id)
        .bind(job.file_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to enqueue thumbnail job: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Thumbnail job created: {} for file {}", job_id, job.file_id);
        Ok(())
    }
}
