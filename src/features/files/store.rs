//! Persistence of file metadata

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileRecord, NewFileRecord, ParentRef};
use crate::shared::types::Page;

/// Filter for listing a user's records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub owner: Uuid,
    /// `None` lists every record of the owner regardless of parent
    pub parent: Option<ParentRef>,
}

/// Access to persisted file records
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Insert a record and return it as stored
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>>;

    /// Find a record by id, only if it belongs to `owner`
    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<FileRecord>>;

    /// Set the public flag of an owned record, returning the updated record
    async fn set_public(&self, id: Uuid, owner: Uuid, is_public: bool)
        -> Result<Option<FileRecord>>;

    /// Matching records, newest first, restricted to `page`
    async fn list(&self, filter: FileFilter, page: Page) -> Result<Vec<FileRecord>>;
}

/// File store backed by the `files` table
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO files (id, user_id, name, kind, parent_id, is_public, local_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, name, kind, parent_id, is_public, local_path, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(record.user_id)
        .bind(&record.name)
        .bind(record.kind)
        .bind(record.parent_id)
        .bind(record.is_public)
        .bind(&record.local_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert file record: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, user_id, name, kind, parent_id, is_public, local_path, created_at
            FROM files
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get file record: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, user_id, name, kind, parent_id, is_public, local_path, created_at
            FROM files
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get owned file record: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn set_public(
        &self,
        id: Uuid,
        owner: Uuid,
        is_public: bool,
    ) -> Result<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            r#"
            UPDATE files
            SET is_public = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, kind, parent_id, is_public, local_path, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(is_public)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update file visibility: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list(&self, filter: FileFilter, page: Page) -> Result<Vec<FileRecord>> {
        let (by_parent, parent_id) = match filter.parent {
            Some(parent) => (true, parent.folder_id()),
            None => (false, None),
        };

        sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, user_id, name, kind, parent_id, is_public, local_path, created_at
            FROM files
            WHERE user_id = $1
            AND ($2 = FALSE OR parent_id IS NOT DISTINCT FROM $3)
            ORDER BY created_at DESC, id DESC
            OFFSET $4
            LIMIT $5
            "#,
        )
        .bind(filter.owner)
        .bind(by_parent)
        .bind(parent_id)
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list file records: {:?}", e);
            AppError::Database(e)
        })
    }
}
