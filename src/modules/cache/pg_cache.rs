use async_trait::async_trait;
use sqlx::PgPool;

use super::KeyValueCache;
use crate::core::error::{AppError, Result};

/// Cache backed by the `session_cache` table
pub struct PgKeyValueCache {
    pool: PgPool,
}

impl PgKeyValueCache {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueCache for PgKeyValueCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT value FROM session_cache
            WHERE key = $1
            AND (expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read cache key: {:?}", e);
            AppError::Database(e)
        })
    }
}
