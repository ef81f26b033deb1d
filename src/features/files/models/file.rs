use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// File kind enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "file_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Folder,
    File,
    Image,
}

impl FileKind {
    /// Whether records of this kind carry stored bytes
    pub fn has_content(&self) -> bool {
        !matches!(self, FileKind::Folder)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Folder => write!(f, "folder"),
            FileKind::File => write!(f, "file"),
            FileKind::Image => write!(f, "image"),
        }
    }
}

impl FromStr for FileKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(FileKind::Folder),
            "file" => Ok(FileKind::File),
            "image" => Ok(FileKind::Image),
            _ => Err(()),
        }
    }
}

/// Location of a record in the folder tree
///
/// On the wire the root is the integer `0` and a folder is its id string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentRef {
    #[default]
    Root,
    Folder(Uuid),
}

impl ParentRef {
    /// Parse a client supplied parent id, `None` when it is not a valid reference
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" | "0" => Some(ParentRef::Root),
            other => Uuid::parse_str(other).ok().map(ParentRef::Folder),
        }
    }

    pub fn folder_id(&self) -> Option<Uuid> {
        match self {
            ParentRef::Root => None,
            ParentRef::Folder(id) => Some(*id),
        }
    }
}

impl From<Option<Uuid>> for ParentRef {
    fn from(id: Option<Uuid>) -> Self {
        id.map(ParentRef::Folder).unwrap_or(ParentRef::Root)
    }
}

impl Serialize for ParentRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParentRef::Root => serializer.serialize_u8(0),
            ParentRef::Folder(id) => id.serialize(serializer),
        }
    }
}

/// Database model for files and folders
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: FileKind,
    pub parent_id: Option<Uuid>,
    pub is_public: bool,
    pub local_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn parent(&self) -> ParentRef {
        self.parent_id.into()
    }
}

/// Data for inserting a file record
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub user_id: Uuid,
    pub name: String,
    pub kind: FileKind,
    pub parent_id: Option<Uuid>,
    pub is_public: bool,
    pub local_path: Option<String>,
}
