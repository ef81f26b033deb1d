use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::errors::FileError;
use crate::features::files::models::FileRecord;
use crate::features::files::store::FileStore;

/// Service toggling whether files can be downloaded anonymously
pub struct VisibilityService {
    store: Arc<dyn FileStore>,
}

impl VisibilityService {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    pub async fn publish(
        &self,
        user: &AuthenticatedUser,
        id: &str,
    ) -> Result<FileRecord, FileError> {
        self.set_visibility(user, id, true).await
    }

    pub async fn unpublish(
        &self,
        user: &AuthenticatedUser,
        id: &str,
    ) -> Result<FileRecord, FileError> {
        self.set_visibility(user, id, false).await
    }

    /// Set the public flag of an owned record
    ///
    /// Records of other users are reported exactly like unknown ids.
    pub async fn set_visibility(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        is_public: bool,
    ) -> Result<FileRecord, FileError> {
        let id = Uuid::parse_str(id).map_err(|_| FileError::NotFound)?;

        let record = self
            .store
            .set_public(id, user.id, is_public)
            .await?
            .ok_or(FileError::NotFound)?;

        info!("File visibility updated: id={}, public={}", record.id, is_public);
        Ok(record)
    }
}
