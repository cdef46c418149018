//! Failures surfaced by the sync client.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::traits::HttpError;

/// Outcome of a request that did not succeed.
///
/// `Clone` because one renewal failure is delivered to every queued caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// No response was obtained.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Error status other than expiry, or an unreadable success body.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Authentication is unrecoverable. Credentials have been cleared and
    /// the logout observer notified; never retry.
    #[error("Session expired")]
    SessionExpired,

    /// 4xx carrying a message meant for the user.
    #[error("{message}")]
    Validation { status: u16, message: String },
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::Network { .. } => ErrorCategory::Network,
            SyncError::Server { .. } => ErrorCategory::Server,
            SyncError::SessionExpired => ErrorCategory::Auth,
            SyncError::Validation { .. } => ErrorCategory::User,
        }
    }

    /// Only a lost session is fatal to the current exam.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::SessionExpired)
    }

    /// Whether the consumer may offer a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Network { .. } => true,
            SyncError::Server { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            SyncError::SessionExpired | SyncError::Validation { .. } => false,
        }
    }

    /// Short code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::Network { .. } => "SYNC_NETWORK",
            SyncError::Server { .. } => "SYNC_SERVER",
            SyncError::SessionExpired => "SYNC_SESSION_EXPIRED",
            SyncError::Validation { .. } => "SYNC_VALIDATION",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            SyncError::Network { .. } => {
                "Unable to reach the server. Please check your connection.".to_string()
            }
            SyncError::Server { status, .. } => match *status {
                404 => "The requested item was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => "The server is having trouble. Please try again later.".to_string(),
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            SyncError::SessionExpired => {
                "Your session has expired. Please sign in again.".to_string()
            }
            SyncError::Validation { message, .. } => message.clone(),
        }
    }

    pub(crate) fn invalid_body(status: u16, err: serde_json::Error) -> Self {
        SyncError::Server {
            status,
            message: format!("Invalid response body: {}", err),
        }
    }
}

impl From<HttpError> for SyncError {
    fn from(err: HttpError) -> Self {
        SyncError::Network {
            message: err.to_string(),
        }
    }
}
