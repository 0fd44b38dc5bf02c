//! Caching decorator for `UserService`

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::MemoryCache;
use crate::data::{ApiError, User};
use crate::service::UserService;

/// Cache slot holding the full user listing
///
/// There is a single slot regardless of how the listing was produced.
pub const ALL_USERS_CACHE_KEY: &str = "AllUsers";

/// Cache key for a single user
pub fn user_cache_key(user_id: i64) -> String {
    format!("User_{}", user_id)
}

/// A `UserService` that answers from a time-bounded cache when it can
///
/// Misses are forwarded to the wrapped service and successful results stored
/// with an absolute expiry of now + `ttl`. Absent users and errors are never
/// cached. Concurrent misses on the same key each call the inner service;
/// whichever finishes last owns the entry.
#[derive(Debug, Clone)]
pub struct CachingUserService<S> {
    inner: S,
    cache: MemoryCache,
    ttl: Duration,
}

impl<S: UserService> CachingUserService<S> {
    pub fn new(inner: S, cache: MemoryCache, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    /// The underlying cache
    pub fn cache(&self) -> &MemoryCache {
        &self.cache
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[async_trait]
impl<S: UserService> UserService for CachingUserService<S> {
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, ApiError> {
        let cache_key = user_cache_key(user_id);

        if let Some(cached) = self.cache.read::<User>(&cache_key) {
            info!(user_id, cache_key = %cache_key, "cache HIT for user");
            return Ok(Some(cached.data));
        }

        info!(user_id, cache_key = %cache_key, "cache MISS for user");
        let user = self.inner.get_user_by_id(user_id).await?;

        if let Some(ref user) = user {
            self.cache.write(&cache_key, user.clone(), self.ttl);
        }
        Ok(user)
    }

    async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
        if let Some(cached) = self.cache.read::<Vec<User>>(ALL_USERS_CACHE_KEY) {
            info!(cache_key = ALL_USERS_CACHE_KEY, count = cached.data.len(), "cache HIT for all users");
            return Ok(cached.data);
        }

        info!(cache_key = ALL_USERS_CACHE_KEY, "cache MISS for all users");
        let users = self.inner.get_all_users().await?;

        // An empty listing is still a result worth keeping
        self.cache.write(ALL_USERS_CACHE_KEY, users.clone(), self.ttl);
        Ok(users)
    }
}
