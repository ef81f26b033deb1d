//! Key/value cache used for session lookups
//!
//! Session tokens are stored as `auth_<token> -> user id` entries by the
//! authentication service that issues them; this crate only reads them.

mod pg_cache;

use async_trait::async_trait;

use crate::core::error::Result;

pub use pg_cache::PgKeyValueCache;

/// Read access to a key/value cache
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Get the value stored under `key`, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;
}
