//! Cached-view invalidation.
//!
//! Every relationship toggle must refresh the cached representation of its
//! target, whether the toggle succeeded or failed, so a partially applied
//! mutation can never leave a stale view behind. Core services depend on the
//! [`ViewInvalidator`] trait rather than the Redis client directly.

use async_trait::async_trait;
use futsalgo_common::{AppResult, ViewCache};

/// A cached view affected by a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewTarget {
    /// The schedule detail view.
    Schedule(String),
    /// A player's profile view.
    UserProfile(String),
    /// A team's profile view.
    TeamProfile(String),
}

impl ViewTarget {
    /// Cache key for this view, scoped to the specific target.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::Schedule(id) => format!("schedule:{id}"),
            Self::UserProfile(id) => format!("user:{id}"),
            Self::TeamProfile(id) => format!("team:{id}"),
        }
    }
}

/// Trait for invalidating cached views.
#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    /// Drop the cached representation of a target.
    async fn invalidate(&self, target: &ViewTarget) -> AppResult<()>;
}

/// Redis-backed invalidator over the shared [`ViewCache`].
#[derive(Clone)]
pub struct CacheViewInvalidator {
    cache: ViewCache,
}

impl CacheViewInvalidator {
    /// Create a new cache-backed invalidator.
    #[must_use]
    pub const fn new(cache: ViewCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl ViewInvalidator for CacheViewInvalidator {
    async fn invalidate(&self, target: &ViewTarget) -> AppResult<()> {
        self.cache.invalidate(&target.cache_key()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys_scoped_to_target() {
        assert_eq!(
            ViewTarget::Schedule("s1".to_string()).cache_key(),
            "schedule:s1"
        );
        assert_eq!(
            ViewTarget::UserProfile("u1".to_string()).cache_key(),
            "user:u1"
        );
        assert_eq!(
            ViewTarget::TeamProfile("t1".to_string()).cache_key(),
            "team:t1"
        );
    }
}
