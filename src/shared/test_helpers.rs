//! In-memory doubles for the storage seams, shared by unit and route tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderName;
use axum_test::TestServer;
use chrono::Utc;
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::core::app::{build_router, AppServices};
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, User};
use crate::features::auth::UserStore;
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::store::{FileFilter, FileStore};
use crate::modules::cache::KeyValueCache;
use crate::modules::queue::{ThumbnailJob, ThumbnailQueue};
use crate::modules::storage::LocalStorage;
use crate::shared::constants::{SESSION_KEY_PREFIX, SESSION_TOKEN_HEADER};
use crate::shared::types::Page;

/// A signed-in user that is not backed by any store
pub fn test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::new_v4(),
        email: SafeEmail().fake(),
    }
}

fn unavailable() -> AppError {
    AppError::Database(sqlx::Error::PoolClosed)
}

#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl InMemoryCache {
    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn fail_reads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn add(&self, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }
}

/// Records kept in insertion order; listings return them newest first
#[derive(Default)]
pub struct InMemoryFileStore {
    records: Mutex<Vec<FileRecord>>,
    failing_writes: AtomicBool,
    failing_reads: AtomicBool,
}

impl InMemoryFileStore {
    pub fn records(&self) -> Vec<FileRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn fail_writes(&self) {
        self.failing_writes.store(true, Ordering::SeqCst);
    }

    pub fn fail_reads(&self) {
        self.failing_reads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let stored = FileRecord {
            id: Uuid::now_v7(),
            user_id: record.user_id,
            name: record.name,
            kind: record.kind,
            parent_id: record.parent_id,
            is_public: record.is_public,
            local_path: record.local_path,
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<FileRecord>> {
        Ok(self
            .find_by_id(id)
            .await?
            .filter(|r| r.user_id == owner))
    }

    async fn set_public(
        &self,
        id: Uuid,
        owner: Uuid,
        is_public: bool,
    ) -> Result<Option<FileRecord>> {
        let mut records = self.records.lock().unwrap();
        Ok(records
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
            .map(|r| {
                r.is_public = is_public;
                r.clone()
            }))
    }

    async fn list(&self, filter: FileFilter, page: Page) -> Result<Vec<FileRecord>> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.user_id == filter.owner)
            .filter(|r| match filter.parent {
                Some(parent) => r.parent_id == parent.folder_id(),
                None => true,
            })
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }
}

/// Thumbnail queue that hands enqueued jobs back to the test
pub struct RecordingThumbnailQueue {
    sender: mpsc::UnboundedSender<ThumbnailJob>,
    receiver: tokio::sync::Mutex<mpsc::UnboundedReceiver<ThumbnailJob>>,
    failing: AtomicBool,
}

impl Default for RecordingThumbnailQueue {
    fn default() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: tokio::sync::Mutex::new(receiver),
            failing: AtomicBool::new(false),
        }
    }
}

impl RecordingThumbnailQueue {
    /// Next enqueued job, `None` if nothing arrives within `wait`
    pub async fn next_job(&self, wait: Duration) -> Option<ThumbnailJob> {
        let mut receiver = self.receiver.lock().await;
        tokio::time::timeout(wait, receiver.recv())
            .await
            .ok()
            .flatten()
    }

    pub fn fail_enqueues(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ThumbnailQueue for RecordingThumbnailQueue {
    async fn enqueue(&self, job: ThumbnailJob) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let _ = self.sender.send(job);
        Ok(())
    }
}

/// The full API router over in-memory stores and a temporary storage folder
pub struct TestApp {
    pub server: TestServer,
    pub cache: Arc<InMemoryCache>,
    pub users: Arc<InMemoryUserStore>,
    pub files: Arc<InMemoryFileStore>,
    pub thumbnails: Arc<RecordingThumbnailQueue>,
    pub storage_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let storage_dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(InMemoryCache::default());
        let users = Arc::new(InMemoryUserStore::default());
        let files = Arc::new(InMemoryFileStore::default());
        let thumbnails = Arc::new(RecordingThumbnailQueue::default());

        let services = AppServices::new(
            cache.clone(),
            users.clone(),
            files.clone(),
            Arc::new(LocalStorage::new(storage_dir.path().join("files"))),
            thumbnails.clone(),
        );
        let server = TestServer::new(build_router(services)).unwrap();

        Self {
            server,
            cache,
            users,
            files,
            thumbnails,
            storage_dir,
        }
    }

    /// Create a user with a live session, returning the user and its token
    pub fn sign_in(&self, email: &str) -> (AuthenticatedUser, String) {
        let user: AuthenticatedUser = self.users.add(email).into();
        let token = Uuid::new_v4().to_string();
        self.cache.insert(
            &format!("{}{}", SESSION_KEY_PREFIX, token),
            &user.id.to_string(),
        );
        (user, token)
    }

    pub fn token_header() -> HeaderName {
        HeaderName::from_static(SESSION_TOKEN_HEADER)
    }
}
