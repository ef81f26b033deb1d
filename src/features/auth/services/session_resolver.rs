use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::store::UserStore;
use crate::modules::cache::KeyValueCache;
use crate::shared::constants::SESSION_KEY_PREFIX;

/// Resolves opaque session tokens to users
///
/// Resolution never fails loudly: a missing session, a stale user id or a
/// lookup error all read as "no user" and callers decide how to answer.
pub struct SessionResolver {
    cache: Arc<dyn KeyValueCache>,
    users: Arc<dyn UserStore>,
}

impl SessionResolver {
    pub fn new(cache: Arc<dyn KeyValueCache>, users: Arc<dyn UserStore>) -> Self {
        Self { cache, users }
    }

    /// Cache key holding the user id for `token`
    pub fn session_key(token: &str) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, token)
    }

    pub async fn resolve(&self, token: &str) -> Option<AuthenticatedUser> {
        let user_id = match self.cache.get(&Self::session_key(token)).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("No session found for token");
                return None;
            }
            Err(e) => {
                warn!("Session lookup failed: {}", e);
                return None;
            }
        };

        let user_id = match Uuid::parse_str(user_id.trim()) {
            Ok(id) => id,
            Err(_) => {
                warn!("Session holds a malformed user id");
                return None;
            }
        };

        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => Some(user.into()),
            Ok(None) => {
                debug!("Session user {} no longer exists", user_id);
                None
            }
            Err(e) => {
                warn!("User lookup failed for {}: {}", user_id, e);
                None
            }
        }
    }
}
