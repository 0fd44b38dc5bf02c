//! HTTP transport with retry
//!
//! Wraps a `reqwest::Client` so that every GET is retried on transient
//! failures with exponential backoff. Callers only ever see the final outcome:
//! either the last response (whatever its status) or the last transport error.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

/// Number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay before the first retry; later retries multiply it
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Growth factor between consecutive retry delays
pub const DEFAULT_BACKOFF_MULTIPLIER: u32 = 2;

/// Retry policy applied to every request the transport issues
///
/// With the defaults a request is attempted at most four times, waiting
/// 1s, 2s and 4s between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt (0 disables retrying)
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Multiplier applied to the delay for each further retry
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Same attempt count as the default, with millisecond delays (for tests)
    pub fn fast() -> Self {
        Self {
            initial_backoff: Duration::from_millis(1),
            ..Self::default()
        }
    }

    /// Delay to wait before retry number `attempt` (1-indexed)
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = self.multiplier.saturating_pow(attempt - 1);
        self.initial_backoff.saturating_mul(factor)
    }
}

/// Whether a response status is worth retrying (5xx or 408)
pub fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT
}

/// Builds the underlying HTTP client with a per-attempt timeout
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// GET-only HTTP transport that applies a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RetryingClient {
    client: Client,
    policy: RetryPolicy,
}

impl Default for RetryingClient {
    fn default() -> Self {
        Self::new(Client::new(), RetryPolicy::default())
    }
}

impl RetryingClient {
    /// Creates a transport over an existing HTTP client
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Sends a GET request, retrying transient failures
    ///
    /// Transport errors and 5xx/408 responses are retried until the policy is
    /// exhausted. Any other status is returned immediately without inspection,
    /// so a 404 reaches the caller on the first attempt.
    ///
    /// Only sending the request and receiving the response head is retried.
    /// Reading the body afterwards happens outside the retry scope.
    pub async fn get(&self, url: &str) -> Result<Response, reqwest::Error> {
        let mut attempt = 0;
        loop {
            debug!(url, attempt, "sending GET request");
            let outcome = self.client.get(url).send().await;

            let retry_reason = match &outcome {
                Ok(response) if is_transient_status(response.status()) => {
                    Some(response.status().to_string())
                }
                Ok(_) => None,
                // A malformed request will not get better by resending it
                Err(err) if err.is_builder() => None,
                Err(err) => Some(err.to_string()),
            };

            let Some(reason) = retry_reason else {
                return outcome;
            };
            if attempt >= self.policy.max_retries {
                return outcome;
            }

            attempt += 1;
            let delay = self.policy.backoff(attempt);
            warn!(
                url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                reason = %reason,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
