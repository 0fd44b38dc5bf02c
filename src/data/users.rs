//! Reqres user-directory API client
//!
//! Fetches users from the remote directory, decodes the JSON envelopes it
//! returns and maps the wire representation into our `User` model.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::User;
use crate::transport::RetryingClient;

/// Errors that can occur when talking to the user directory
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be completed (DNS, connection, timeout)
    #[error("network error while requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("unexpected HTTP status {status} from {url}")]
    Http { url: String, status: StatusCode },

    /// The response body was not the expected JSON
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    NetworkFailure,
    HttpFailure,
    DecodeFailure,
}

impl ApiError {
    /// The error's classification
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network { .. } => ApiErrorKind::NetworkFailure,
            ApiError::Http { .. } => ApiErrorKind::HttpFailure,
            ApiError::Decode { .. } => ApiErrorKind::DecodeFailure,
        }
    }

    /// HTTP status for `Http` errors
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A user as the remote API represents it
///
/// Missing fields decode to empty values rather than failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ExternalUser {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

/// Envelope returned by `GET /users/{id}`
#[derive(Debug, Deserialize)]
struct SingleUserEnvelope {
    #[serde(default)]
    data: Option<ExternalUser>,
}

/// Envelope returned by `GET /users?page=N`
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct PaginatedEnvelope {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    per_page: u32,
    #[serde(default)]
    total: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    data: Option<Vec<ExternalUser>>,
}

/// Maps a wire user into the internal model
///
/// Every field is copied unchanged; an absent input yields an absent output.
pub(crate) fn map_user(external: Option<ExternalUser>) -> Option<User> {
    external.map(|external| User {
        id: external.id,
        email: external.email,
        first_name: external.first_name,
        last_name: external.last_name,
    })
}

/// Operations offered by the remote user directory
#[async_trait]
pub trait ReqresApi: Send + Sync {
    /// Fetches one user; `Ok(None)` when the directory has no such user
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, ApiError>;

    /// Fetches every user, following pagination to the end
    async fn get_all_users(&self) -> Result<Vec<User>, ApiError>;
}

/// Client for the reqres user-directory HTTP API
#[derive(Debug, Clone)]
pub struct ReqresApiClient {
    /// Transport that applies the retry policy
    transport: RetryingClient,
    /// Base URL for the API, without trailing slash
    base_url: String,
}

impl ReqresApiClient {
    /// Creates a client for the API rooted at `base_url`
    pub fn new(transport: RetryingClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
        }
    }

    /// The base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_url(&self, user_id: i64) -> String {
        format!("{}/users/{}", self.base_url, user_id)
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}/users?page={}", self.base_url, page)
    }

    /// Sends a GET and returns the status and raw body
    async fn fetch(&self, url: &str) -> Result<(StatusCode, String), ApiError> {
        let response = self
            .transport
            .get(url)
            .await
            .map_err(|source| ApiError::Network {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Network {
            url: url.to_string(),
            source,
        })?;
        Ok((status, body))
    }

    /// Fetches and decodes one page of the user listing
    async fn fetch_page(&self, page: u32) -> Result<PaginatedEnvelope, ApiError> {
        let url = self.page_url(page);
        let (status, body) = self.fetch(&url).await?;
        if !status.is_success() {
            return Err(ApiError::Http { url, status });
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }
}

#[async_trait]
impl ReqresApi for ReqresApiClient {
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, ApiError> {
        let url = self.user_url(user_id);
        let (status, body) = self.fetch(&url).await.inspect_err(|err| {
            error!(user_id, error = %err, "network error fetching user");
        })?;

        if status == StatusCode::NOT_FOUND {
            warn!(user_id, "user not found (404)");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::Http { url, status });
        }

        let envelope: SingleUserEnvelope =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })?;
        Ok(map_user(envelope.data))
    }

    async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
        let mut users = Vec::new();
        let mut current_page = 1;
        let mut total_pages = 1;

        // total_pages is re-read from every page, so it is only known after page 1
        while current_page <= total_pages {
            let envelope = self.fetch_page(current_page).await.inspect_err(|err| {
                error!(page = current_page, error = %err, "failed fetching users page");
            })?;

            let data = match envelope.data {
                Some(data) if !data.is_empty() => data,
                _ => {
                    debug!(page = current_page, "empty page, stopping pagination");
                    break;
                }
            };

            debug!(
                page = current_page,
                total_pages = envelope.total_pages,
                count = data.len(),
                "fetched users page"
            );
            users.extend(data.into_iter().filter_map(|external| map_user(Some(external))));
            total_pages = envelope.total_pages;
            current_page += 1;
        }

        Ok(users)
    }
}
