//! In-memory cache with absolute expiry
//!
//! Provides a `MemoryCache` that stores arbitrary cloneable values under
//! string keys, each with its own expiry timestamp. Expired entries are never
//! returned; they are dropped the next time someone reads them.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// A stored value plus its timestamps
struct CacheEntry {
    /// The cached value, type-erased
    value: Arc<dyn Any + Send + Sync>,
    /// When the value was stored
    cached_at: DateTime<Utc>,
    /// When the value stops being served
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Result of a cache hit
#[derive(Debug, Clone)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was cached
    pub cached_at: DateTime<Utc>,
    /// When the entry expires
    pub expires_at: DateTime<Utc>,
}

/// Process-lifetime cache shared between clones
///
/// Safe for concurrent reads and writes; there is no size bound and no
/// background eviction.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl MemoryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `key`, replacing any previous entry
    ///
    /// The entry expires `ttl` after now, regardless of how often it is read.
    pub fn write<T: Any + Send + Sync>(&self, key: &str, data: T, ttl: Duration) {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value: Arc::new(data),
                cached_at: now,
                expires_at,
            },
        );
    }

    /// Reads a fresh entry
    ///
    /// Returns `None` if the key is missing, holds a value of another type, or
    /// has expired. Expired entries are removed as a side effect.
    pub fn read<T: Any + Clone>(&self, key: &str) -> Option<CachedData<T>> {
        let now = Utc::now();
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(now) {
                let data = entry.value.downcast_ref::<T>()?.clone();
                return Some(CachedData {
                    data,
                    cached_at: entry.cached_at,
                    expires_at: entry.expires_at,
                });
            }
        }

        // The read guard is gone; a writer may have refreshed the entry meanwhile
        self.entries
            .remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Whether a fresh entry exists for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(Utc::now()))
    }

    /// Number of stored entries, expired ones included until they are read
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
