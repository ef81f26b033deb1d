//! Background job queue for thumbnail generation
//!
//! Jobs are persisted as `pending` rows and consumed by an external worker
//! that writes the `<local_path>_<width>` variants served by downloads.

mod thumbnail_queue;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::Result;

pub use thumbnail_queue::PgThumbnailQueue;

/// Payload of a thumbnail generation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailJob {
    pub user_id: Uuid,
    pub file_id: Uuid,
}

/// Enqueue side of the thumbnail job queue
#[async_trait]
pub trait ThumbnailQueue: Send + Sync {
    async fn enqueue(&self, job: ThumbnailJob) -> Result<()>;
}
