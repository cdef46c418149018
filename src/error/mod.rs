//! Error types for the exam client.
//!
//! | Type | Raised by | Fatal |
//! |------|-----------|-------|
//! | [`SyncError::Network`] | sync client, no response | no, retry |
//! | [`SyncError::Server`] | sync client, error status | no |
//! | [`SyncError::Validation`] | sync client, 4xx with message | no, user fixes input |
//! | [`SyncError::SessionExpired`] | sync client, renewal refused | yes, go to login |
//! | [`SessionError::Configuration`] | selection / engine construction | no |

mod category;
mod session;
mod sync;

pub use category::ErrorCategory;
pub use session::SessionError;
pub use sync::SyncError;

/// Result alias for sync client calls.
pub type SyncResult<T> = Result<T, SyncError>;

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
