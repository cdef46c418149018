//! Failures surfaced by exam selection and the session engine.

use thiserror::Error;

use super::category::ErrorCategory;
use super::sync::SyncError;
use crate::session::SessionStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A call in the start or submission sequence failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// The exam cannot be built from this configuration or question set.
    #[error("Invalid exam configuration: {0}")]
    Configuration(String),

    /// The operation is not allowed in the session's current status.
    #[error("Cannot {action} while the session is {status}")]
    InvalidState {
        action: &'static str,
        status: SessionStatus,
    },
}

impl SessionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        SessionError::Configuration(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::Sync(err) => err.category(),
            SessionError::Configuration(_) => ErrorCategory::Configuration,
            SessionError::InvalidState { .. } => ErrorCategory::Client,
        }
    }

    /// The consumer must leave the exam and go to login.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Sync(err) if err.is_fatal())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Sync(err) if err.is_retryable())
    }
}
