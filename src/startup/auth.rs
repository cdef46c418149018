//! Sign-in at startup.
//!
//! Restores the stored session when there is one, otherwise asks for
//! credentials through a [`LoginPrompt`] until the service accepts them or
//! the attempts run out.

use crate::auth::{AuthSession, CachedUser};
use crate::error::{SyncError, SyncResult};

/// Wrong credentials tolerated before giving up.
pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

/// Email and password typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Source of login input. `None` means the user gave up.
pub trait LoginPrompt {
    fn ask(&mut self, attempt: u32, previous_error: Option<&SyncError>) -> Option<LoginInput>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    /// A stored session was restored without prompting.
    Restored(Option<CachedUser>),
    /// The user logged in.
    LoggedIn(CachedUser),
    /// The prompt was abandoned or attempts ran out.
    Cancelled,
}

/// Restore or log in.
///
/// Rejected credentials ([`SyncError::Validation`]) prompt again. Any other
/// error is returned.
pub async fn ensure_signed_in(
    auth: &AuthSession,
    prompt: &mut dyn LoginPrompt,
) -> SyncResult<SignIn> {
    if auth.restore().await {
        return Ok(SignIn::Restored(auth.current_user()));
    }

    let mut previous: Option<SyncError> = None;
    for attempt in 1..=MAX_LOGIN_ATTEMPTS {
        let Some(input) = prompt.ask(attempt, previous.as_ref()) else {
            return Ok(SignIn::Cancelled);
        };
        match auth.login(&input.email, &input.password).await {
            Ok(user) => return Ok(SignIn::LoggedIn(user)),
            Err(err @ SyncError::Validation { .. }) => {
                tracing::info!(attempt, "Login rejected");
                previous = Some(err);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(SignIn::Cancelled)
}
