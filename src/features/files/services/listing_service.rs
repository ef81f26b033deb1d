use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::errors::FileError;
use crate::features::files::models::{FileRecord, ParentRef};
use crate::features::files::store::{FileFilter, FileStore};
use crate::shared::types::Page;

/// Read side of a user's files
pub struct ListingService {
    store: Arc<dyn FileStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// Page index from the `page` query value
    ///
    /// Absent or empty means the first page; anything that is not a
    /// non-negative integer is `NotFound`.
    pub fn parse_page(raw: Option<&str>) -> Result<Page, FileError> {
        match raw.map(str::trim).filter(|p| !p.is_empty()) {
            None => Ok(Page::default()),
            Some(raw) => raw.parse::<u32>().map(Page::new).map_err(|_| {
                debug!("Listing with unusable page '{}'", raw);
                FileError::NotFound
            }),
        }
    }

    /// One page of the user's records, newest first
    ///
    /// Without `parent_id` every record is listed, `"0"` lists the root and
    /// a folder id lists that folder. A parent id that cannot match any
    /// owned folder gives an empty page, as does a page past the end.
    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        parent_id: Option<&str>,
        page: Page,
    ) -> Result<Vec<FileRecord>, FileError> {
        let parent = match parent_id.filter(|p| !p.is_empty()) {
            None => None,
            Some(raw) => match ParentRef::parse(raw) {
                Some(parent) => Some(parent),
                None => {
                    debug!("Listing with malformed parent id, returning an empty page");
                    return Ok(Vec::new());
                }
            },
        };

        let filter = FileFilter {
            owner: user.id,
            parent,
        };

        self.store.list(filter, page).await.map_err(|e| {
            error!("Failed to list files for user {}: {}", user.id, e);
            FileError::NotFound
        })
    }

    /// A single record owned by the user
    pub async fn get_owned(
        &self,
        user: &AuthenticatedUser,
        id: &str,
    ) -> Result<FileRecord, FileError> {
        let id = Uuid::parse_str(id).map_err(|_| FileError::NotFound)?;

        self.store
            .find_owned(id, user.id)
            .await?
            .ok_or(FileError::NotFound)
    }
}
