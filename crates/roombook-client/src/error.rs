//! Error types for the booking client

use roombook_core::BookingStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Fallback shown when the backend rejects a request without a message
pub const GENERIC_FAILURE: &str = "Terjadi kesalahan, silakan coba lagi.";

/// Errors that can occur while talking to the backend or gating an action
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or transport failure
    #[error("Failed to reach the booking service: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Backend message, or a generic fallback
        message: String,
    },

    /// A response body did not have the expected shape
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode {
        /// Endpoint path
        endpoint: String,
        /// Decoder message
        message: String,
    },

    /// No session is stored, or the session does not grant access
    #[error("Not logged in. Run `roombook login` first.")]
    NotAuthenticated,

    /// The session user lacks the admin role
    #[error("This action requires an administrator account")]
    Forbidden,

    /// A local check failed before any request was sent
    #[error("{0}")]
    Precondition(String),

    /// Booking not present in the latest snapshot
    #[error("Booking #{id} not found")]
    BookingNotFound {
        /// Booking identifier
        id: i64,
    },

    /// The booking is no longer in a state that allows the action
    #[error("Booking #{id} is already {status}")]
    NotPending {
        /// Booking identifier
        id: i64,
        /// Current backend status
        status: BookingStatus,
    },

    /// Another mutation is still in flight
    #[error("Another request is still being processed")]
    Busy,

    /// Session file could not be read or written
    #[error("Session file {path}: {source}")]
    Session {
        /// Session file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input failed validation, or configuration was invalid
    #[error(transparent)]
    Core(#[from] roombook_core::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Build a rejection from a status and a raw response body
    pub fn rejected(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            extract_message(body)
        };
        Self::Rejected { status, message }
    }

    /// Whether the failure happened before the request reached the backend
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated
                | Self::Forbidden
                | Self::Precondition(_)
                | Self::BookingNotFound { .. }
                | Self::NotPending { .. }
                | Self::Busy
                | Self::Core(_)
        )
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Core(errors.into())
    }
}

/// Backends answer either with plain text or a JSON object carrying a
/// `message`/`error`/`title` field; fall back to the raw body.
fn extract_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(text)) => text,
        Ok(serde_json::Value::Object(map)) => ["message", "error", "title"]
            .iter()
            .find_map(|key| map.get(*key).and_then(serde_json::Value::as_str))
            .map_or_else(|| body.to_string(), ToString::to_string),
        _ => body.to_string(),
    }
}
