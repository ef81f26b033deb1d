use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::files::models::{FileKind, FileRecord, ParentRef};

/// Parent id as sent by clients
///
/// Accepts `0` or `"0"` for the root and a folder id string otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ParentIdInput {
    Number(i64),
    Text(String),
}

impl ParentIdInput {
    /// Resolve into a parent reference, `None` when it cannot name a folder
    pub fn to_parent_ref(&self) -> Option<ParentRef> {
        match self {
            ParentIdInput::Number(0) => Some(ParentRef::Root),
            ParentIdInput::Number(_) => None,
            ParentIdInput::Text(raw) => ParentRef::parse(raw),
        }
    }
}

/// Upload request DTO
///
/// Every field is optional at the parsing stage so missing fields are
/// reported one by one, in order, by the upload service.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileDto {
    /// File or folder name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    #[schema(example = "a.txt")]
    pub name: Option<String>,
    /// One of "folder", "file" or "image"
    #[serde(rename = "type")]
    #[schema(example = "file")]
    pub kind: Option<String>,
    /// Parent folder id, `0` for the root (default)
    #[schema(value_type = Option<String>, example = "0")]
    pub parent_id: Option<ParentIdInput>,
    /// Whether the file can be downloaded anonymously (default false)
    pub is_public: Option<bool>,
    /// Base64 encoded content, required unless type is "folder"
    #[schema(example = "SGVsbG8=")]
    pub data: Option<String>,
}

/// Public view of a file record
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponseDto {
    /// Unique identifier for the file
    pub id: Uuid,
    /// Owner of the file
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub is_public: bool,
    /// Parent folder id, `0` for the root
    #[schema(value_type = String, example = "0")]
    pub parent_id: ParentRef,
}

impl From<FileRecord> for FileResponseDto {
    fn from(record: FileRecord) -> Self {
        let parent_id = record.parent();
        Self {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            kind: record.kind,
            is_public: record.is_public,
            parent_id,
        }
    }
}

/// Query parameters for listing files
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    /// Only list records under this folder (`0` for the root)
    pub parent_id: Option<String>,
    /// Page number (0-indexed, 20 records per page)
    #[param(value_type = Option<u32>, minimum = 0)]
    pub page: Option<String>,
}

/// Query parameters for downloading file content
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DownloadQuery {
    /// Thumbnail width variant, e.g. 500, 250 or 100
    pub size: Option<String>,
}
