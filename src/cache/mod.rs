//! Caching for user lookups
//!
//! `MemoryCache` is a process-lifetime key/value store with per-entry absolute
//! expiry. `CachingUserService` puts it in front of any `UserService`, so
//! repeated lookups within the TTL never reach the network.

mod decorator;
mod manager;

pub use decorator::{user_cache_key, CachingUserService, ALL_USERS_CACHE_KEY};
pub use manager::{CachedData, MemoryCache};
