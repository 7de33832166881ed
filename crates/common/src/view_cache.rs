//! Redis-backed cache for rendered views.
//!
//! Schedule, player-profile, and team-profile responses are cached as JSON
//! under a key scoped to the subject. Toggle mutations must invalidate the
//! affected key after every call, so that no stale representation of the
//! target outlives the mutation.

use crate::error::{AppError, AppResult};
use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use fred::types::Expiration;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default TTL for cached views: 5 minutes.
const DEFAULT_VIEW_TTL_SECS: i64 = 5 * 60;

/// Cache for rendered views, keyed per subject.
#[derive(Clone)]
pub struct ViewCache {
    redis: Arc<RedisClient>,
    prefix: String,
    ttl_secs: i64,
}

impl ViewCache {
    /// Create a new view cache with the default TTL.
    #[must_use]
    pub const fn new(redis: Arc<RedisClient>, prefix: String) -> Self {
        Self {
            redis,
            prefix,
            ttl_secs: DEFAULT_VIEW_TTL_SECS,
        }
    }

    /// Create a new view cache with a custom TTL.
    #[must_use]
    pub fn with_ttl(redis: Arc<RedisClient>, prefix: String, ttl: Duration) -> Self {
        Self {
            redis,
            prefix,
            ttl_secs: ttl.as_secs() as i64,
        }
    }

    fn cache_key(&self, key: &str) -> String {
        format!("{}:view:{key}", self.prefix)
    }

    /// Get a cached view as raw JSON.
    ///
    /// Returns `Ok(Some(json))` on a hit, `Ok(None)` on a miss.
    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.cache_key(key);

        let result: Option<String> = self
            .redis
            .get(full_key)
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;

        if result.is_some() {
            debug!(key = %key, "View cache hit");
        } else {
            debug!(key = %key, "View cache miss");
        }

        Ok(result)
    }

    /// Store a rendered view.
    pub async fn set(&self, key: &str, json: &str) -> AppResult<()> {
        let full_key = self.cache_key(key);

        self.redis
            .set::<(), _, _>(
                full_key,
                json,
                Some(Expiration::EX(self.ttl_secs)),
                None,
                false,
            )
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;

        debug!(key = %key, "Cached view");
        Ok(())
    }

    /// Invalidate a cached view.
    pub async fn invalidate(&self, key: &str) -> AppResult<()> {
        let full_key = self.cache_key(key);

        self.redis
            .del::<(), _>(full_key)
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;

        debug!(key = %key, "Invalidated cached view");
        Ok(())
    }
}
