//! Core data model for the reqres client
//!
//! This module contains the internal `User` type handed to callers, and the
//! API client that produces it from the remote user directory.

pub mod users;

pub use users::{ApiError, ApiErrorKind, ReqresApi, ReqresApiClient};

use serde::{Deserialize, Serialize};

/// A user from the remote directory, in the shape the rest of the crate uses
///
/// Produced by mapping the wire representation; the field values are copied
/// as-is, with no validation of the email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Directory identifier
    pub id: i64,
    /// Email address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl User {
    /// Full display name, "first last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
