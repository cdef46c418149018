//! In-memory authentication state, mirrored from the credential store.

use std::sync::{Arc, RwLock};

use super::api::{AuthResponse, LoginRequest, RegisterRequest};
use super::credentials::{CachedUser, Credentials};
use crate::error::{SyncError, SyncResult};
use crate::sync::{RequestSpec, SyncClient, LOGIN_PATH, REGISTER_PATH};

/// Holds who is signed in and keeps the sync client's token in step with
/// the credential store.
pub struct AuthSession {
    client: Arc<SyncClient>,
    user: RwLock<Option<CachedUser>>,
}

impl AuthSession {
    pub fn new(client: Arc<SyncClient>) -> Self {
        Self {
            client,
            user: RwLock::new(None),
        }
    }

    pub fn client(&self) -> &Arc<SyncClient> {
        &self.client
    }

    /// Load persisted credentials and seed the sync client.
    ///
    /// A store failure is treated as signed out. Returns whether a session
    /// was restored.
    pub async fn restore(&self) -> bool {
        match self.client.credentials().load().await {
            Ok(Some(creds)) if creds.has_token() => {
                tracing::info!("Restored stored session");
                self.client.set_token(Some(creds.access_token));
                self.set_user(creds.user);
                true
            }
            Ok(_) => {
                tracing::debug!("No stored session");
                false
            }
            Err(e) => {
                tracing::warn!("Could not load stored credentials: {}", e);
                false
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> SyncResult<CachedUser> {
        let spec = RequestSpec::post_json(LOGIN_PATH, &LoginRequest { email, password })
            .map_err(|e| SyncError::invalid_body(0, e))?;
        self.authenticate(spec).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> SyncResult<CachedUser> {
        let spec = RequestSpec::post_json(
            REGISTER_PATH,
            &RegisterRequest {
                name,
                email,
                password,
            },
        )
        .map_err(|e| SyncError::invalid_body(0, e))?;
        self.authenticate(spec).await
    }

    /// Voluntary sign-out. Clears memory and store; the logout observer is
    /// reserved for involuntary session loss and is not called.
    pub async fn logout(&self) {
        self.client.set_token(None);
        self.set_user(None);
        if let Err(e) = self.client.credentials().clear().await {
            tracing::warn!("Could not clear stored credentials: {}", e);
        }
        tracing::info!("Signed out");
    }

    /// Signed-in user, or `None` once the sync client has dropped the token.
    pub fn current_user(&self) -> Option<CachedUser> {
        let mut user = self.user.write().unwrap_or_else(|e| e.into_inner());
        if !self.client.has_token() {
            *user = None;
        }
        user.clone()
    }

    /// Whether the sync client holds a token. It may drop one on its own
    /// when renewal is refused, so this is not cached here.
    pub fn is_authenticated(&self) -> bool {
        self.client.has_token()
    }

    async fn authenticate(&self, spec: RequestSpec) -> SyncResult<CachedUser> {
        let response: AuthResponse = self.client.request_json(&spec).await?;
        let user: CachedUser = response.user.into();

        self.client.set_token(Some(response.token.clone()));
        self.set_user(Some(user.clone()));

        let creds = Credentials::new(response.token, Some(user.clone()));
        if let Err(e) = self.client.credentials().save(&creds).await {
            tracing::warn!("Signed in but could not persist credentials: {}", e);
        }
        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    fn set_user(&self, user: Option<CachedUser>) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = user;
    }
}
