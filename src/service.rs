//! User service
//!
//! The capability callers program against. `ExternalUserService` forwards to
//! the API client; the caching decorator in `crate::cache` wraps any
//! implementation behind the same trait.

use async_trait::async_trait;
use tracing::info;

use crate::data::{ApiError, ReqresApi, User};

/// Looks up users in the directory
#[async_trait]
pub trait UserService: Send + Sync {
    /// Fetches one user; `Ok(None)` when the user does not exist
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, ApiError>;

    /// Fetches every user in the directory
    async fn get_all_users(&self) -> Result<Vec<User>, ApiError>;
}

#[async_trait]
impl<S: UserService + ?Sized> UserService for Box<S> {
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, ApiError> {
        (**self).get_user_by_id(user_id).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
        (**self).get_all_users().await
    }
}

/// User service backed directly by the remote API
#[derive(Debug, Clone)]
pub struct ExternalUserService<A> {
    api: A,
}

impl<A: ReqresApi> ExternalUserService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: ReqresApi> UserService for ExternalUserService<A> {
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, ApiError> {
        info!(user_id, "service: getting user");
        self.api.get_user_by_id(user_id).await
    }

    async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
        info!("service: getting all users");
        self.api.get_all_users().await
    }
}
