//! Application wiring and the demo runner
//!
//! Builds the transport → API client → service → cache stack from startup
//! settings, and runs the command the user asked for against it.

use thiserror::Error;
use tracing::info;

use crate::cache::{CachingUserService, MemoryCache};
use crate::cli::{Command, StartupConfig};
use crate::data::{ApiError, ReqresApiClient, User};
use crate::service::{ExternalUserService, UserService};
use crate::transport::{build_http_client, RetryingClient};

/// The fully assembled service stack
pub type DefaultUserService = CachingUserService<ExternalUserService<ReqresApiClient>>;

/// User id fetched by the demo sequence
pub const DEMO_USER_ID: i64 = 2;

/// Assembles the cached, retrying user service described by `config`
pub fn build_service(config: &StartupConfig) -> Result<DefaultUserService, reqwest::Error> {
    let http_client = build_http_client(config.api.request_timeout())?;
    let transport = RetryingClient::new(http_client, config.retry.clone());
    let api = ReqresApiClient::new(transport, config.api.base_url.clone());
    let service = ExternalUserService::new(api);

    Ok(CachingUserService::new(
        service,
        MemoryCache::new(),
        config.api.cache_ttl(),
    ))
}

/// Errors that can occur while running a command
#[derive(Debug, Error)]
pub enum AppError {
    /// The user directory could not be queried
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The result could not be rendered as JSON
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// What the demo sequence observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSummary {
    /// Users returned by the second (cached) listing
    pub user_count: usize,
    /// The demo user, if the directory has it
    pub user: Option<User>,
}

/// Runs commands against a user service
pub struct App<S> {
    service: S,
}

impl<S: UserService> App<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Executes `command` and returns the text to print
    pub async fn run(&self, command: &Command) -> Result<String, AppError> {
        match command {
            Command::Demo => {
                let summary = self.run_demo().await?;
                let user_line = match &summary.user {
                    Some(user) => format!("user {}: {} <{}>", user.id, user.full_name(), user.email),
                    None => format!("user {} not found", DEMO_USER_ID),
                };
                Ok(format!("{} users\n{}", summary.user_count, user_line))
            }
            Command::User { id } => match self.service.get_user_by_id(*id).await? {
                Some(user) => Ok(serde_json::to_string_pretty(&user)?),
                None => Ok(format!("user {} not found", id)),
            },
            Command::Users => {
                let users = self.service.get_all_users().await?;
                Ok(serde_json::to_string_pretty(&users)?)
            }
        }
    }

    /// Lists all users twice, then fetches the demo user twice
    ///
    /// With a caching service the second call of each pair is a cache hit.
    pub async fn run_demo(&self) -> Result<DemoSummary, ApiError> {
        info!("--- reqres client demo ---");

        info!("[RUN 1] fetching all users (expect cache MISS)");
        self.service.get_all_users().await?;

        info!("[RUN 2] fetching all users again (expect cache HIT)");
        let users = self.service.get_all_users().await?;
        info!(count = users.len(), "got users from service");

        info!(user_id = DEMO_USER_ID, "[RUN 1] fetching user (expect cache MISS)");
        self.service.get_user_by_id(DEMO_USER_ID).await?;

        info!(user_id = DEMO_USER_ID, "[RUN 2] fetching user again (expect cache HIT)");
        let user = self.service.get_user_by_id(DEMO_USER_ID).await?;

        info!("--- demo finished ---");
        Ok(DemoSummary {
            user_count: users.len(),
            user,
        })
    }
}
