use std::sync::Arc;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::UploadFileDto;
use crate::features::files::errors::FileError;
use crate::features::files::models::{FileKind, FileRecord, NewFileRecord, ParentRef};
use crate::features::files::store::FileStore;
use crate::modules::queue::{ThumbnailJob, ThumbnailQueue};
use crate::modules::storage::LocalStorage;

/// Standard alphabet, padding optional
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A write step that failed without failing the upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffortFailure {
    /// The storage root could not be created
    StorageDirectory(String),
    /// The content could not be written to its path
    BlobWrite(String),
}

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub record: FileRecord,
    pub degraded: Vec<BestEffortFailure>,
}

/// Upload request that passed validation
#[derive(Debug)]
struct ValidUpload {
    name: String,
    kind: FileKind,
    parent: ParentRef,
    is_public: bool,
    content: Option<Vec<u8>>,
}

/// Service creating files and folders
pub struct UploadService {
    store: Arc<dyn FileStore>,
    storage: Arc<LocalStorage>,
    thumbnails: Arc<dyn ThumbnailQueue>,
}

impl UploadService {
    pub fn new(
        store: Arc<dyn FileStore>,
        storage: Arc<LocalStorage>,
        thumbnails: Arc<dyn ThumbnailQueue>,
    ) -> Self {
        Self {
            store,
            storage,
            thumbnails,
        }
    }

    /// Create a file or folder for `user`
    ///
    /// Folders are metadata only. Files and images get their decoded content
    /// written under the storage root first; a failed directory creation or
    /// write is reported in `degraded` and the record is still created.
    /// Images additionally get a thumbnail job queued in the background.
    pub async fn upload(
        &self,
        user: &AuthenticatedUser,
        dto: UploadFileDto,
    ) -> Result<UploadOutcome, FileError> {
        let upload = Self::validate(dto)?;
        self.check_parent(user, upload.parent).await?;

        let mut degraded = Vec::new();
        let local_path = match upload.content {
            Some(ref content) => Some(self.write_content(content, &mut degraded).await),
            None => None,
        };

        let record = self
            .store
            .insert(NewFileRecord {
                user_id: user.id,
                name: upload.name,
                kind: upload.kind,
                parent_id: upload.parent.folder_id(),
                is_public: upload.is_public,
                local_path,
            })
            .await?;

        info!(
            "File record created: id={}, kind={}, owner={}",
            record.id, record.kind, record.user_id
        );

        if record.kind == FileKind::Image {
            self.queue_thumbnails(ThumbnailJob {
                user_id: record.user_id,
                file_id: record.id,
            });
        }

        Ok(UploadOutcome { record, degraded })
    }

    /// Check required fields in order, first failure wins
    fn validate(dto: UploadFileDto) -> Result<ValidUpload, FileError> {
        let name = dto
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(FileError::MissingName)?;

        let kind = dto
            .kind
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(FileError::MissingType)?
            .parse::<FileKind>()
            .map_err(|_| FileError::InvalidType)?;

        let data = dto.data.as_deref().filter(|d| !d.is_empty());
        if kind.has_content() && data.is_none() {
            return Err(FileError::MissingData);
        }

        dto.validate()
            .map_err(|e| FileError::Validation(e.to_string()))?;

        let content = match data {
            Some(data) if kind.has_content() => Some(
                PAYLOAD_ENGINE
                    .decode(data.trim())
                    .map_err(|_| FileError::InvalidData)?,
            ),
            _ => None,
        };

        let parent = match dto.parent_id {
            Some(ref raw) => raw.to_parent_ref().ok_or(FileError::ParentNotFound)?,
            None => ParentRef::Root,
        };

        Ok(ValidUpload {
            name: name.to_string(),
            kind,
            parent,
            is_public: dto.is_public.unwrap_or(false),
            content,
        })
    }

    /// A non-root parent must be a folder owned by the uploader
    async fn check_parent(
        &self,
        user: &AuthenticatedUser,
        parent: ParentRef,
    ) -> Result<(), FileError> {
        let Some(parent_id) = parent.folder_id() else {
            return Ok(());
        };

        let parent = self
            .store
            .find_owned(parent_id, user.id)
            .await?
            .ok_or(FileError::ParentNotFound)?;

        if parent.kind != FileKind::Folder {
            return Err(FileError::ParentNotFolder);
        }

        Ok(())
    }

    /// Write `content` to a fresh path, returning the path whether or not it succeeded
    async fn write_content(
        &self,
        content: &[u8],
        degraded: &mut Vec<BestEffortFailure>,
    ) -> String {
        if let Err(e) = self.storage.ensure_root().await {
            warn!(
                "Failed to create storage directory '{}': {}",
                self.storage.root().display(),
                e
            );
            degraded.push(BestEffortFailure::StorageDirectory(e.to_string()));
        }

        let path = self.storage.generate_path();
        match self.storage.write(&path, content).await {
            Ok(()) => debug!("Stored upload at '{}'", path.display()),
            Err(e) => {
                warn!("Failed to write upload to '{}': {}", path.display(), e);
                degraded.push(BestEffortFailure::BlobWrite(e.to_string()));
            }
        }

        path.to_string_lossy().into_owned()
    }

    /// Fire and forget, the upload response never waits for the queue
    fn queue_thumbnails(&self, job: ThumbnailJob) {
        let queue = Arc::clone(&self.thumbnails);
        tokio::spawn(async move {
            if let Err(e) = queue.enqueue(job).await {
                warn!("Failed to queue thumbnails for file {}: {}", job.file_id, e);
            }
        });
    }
}
