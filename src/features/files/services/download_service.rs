use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::features::auth::SessionResolver;
use crate::features::files::errors::FileError;
use crate::features::files::models::FileRecord;
use crate::features::files::store::FileStore;
use crate::modules::storage::LocalStorage;
use crate::shared::constants::DEFAULT_CONTENT_TYPE;
use crate::shared::validation::SIZE_VARIANT_REGEX;

/// Bytes of a stored file ready to be served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Service serving file contents
///
/// Public files are served to anyone. Private files are served to their
/// owner only, and every other caller gets the same `NotFound` as for an
/// id that does not exist.
pub struct DownloadService {
    store: Arc<dyn FileStore>,
    storage: Arc<LocalStorage>,
    sessions: Arc<SessionResolver>,
}

impl DownloadService {
    pub fn new(
        store: Arc<dyn FileStore>,
        storage: Arc<LocalStorage>,
        sessions: Arc<SessionResolver>,
    ) -> Self {
        Self {
            store,
            storage,
            sessions,
        }
    }

    /// Content of file `id`, or of its `size` variant
    ///
    /// An empty `size` serves the file itself. The session token is only
    /// resolved when the file is private.
    pub async fn download(
        &self,
        id: &str,
        token: Option<&str>,
        size: Option<&str>,
    ) -> Result<FileContent, FileError> {
        let size = size.filter(|s| !s.is_empty());
        let id = Uuid::parse_str(id).map_err(|_| FileError::NotFound)?;
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(FileError::NotFound)?;

        if !record.is_public {
            let user = match token {
                Some(token) => self.sessions.resolve(token).await,
                None => None,
            }
            .ok_or(FileError::NotFound)?;

            if user.id != record.user_id {
                info!(
                    "Denied download of private file {} to user {}",
                    record.id, user.id
                );
                return Err(FileError::NotFound);
            }
        }

        self.read_content(&record, size).await
    }

    async fn read_content(
        &self,
        record: &FileRecord,
        size: Option<&str>,
    ) -> Result<FileContent, FileError> {
        if !record.kind.has_content() {
            return Err(FileError::NoContentForFolder);
        }

        let local_path = record.local_path.as_deref().ok_or(FileError::NotFound)?;

        if let Some(size) = size {
            if !SIZE_VARIANT_REGEX.is_match(size) {
                return Err(FileError::NotFound);
            }
        }

        let path = LocalStorage::variant_path(local_path, size);
        let data = self.storage.read(&path).await.map_err(|e| {
            debug!("Failed to read '{}': {}", path.display(), e);
            FileError::NotFound
        })?;

        let content_type = mime_guess::from_path(&record.name)
            .first()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Ok(FileContent { data, content_type })
    }
}
