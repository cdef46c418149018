//! Composition root: wires transport, credential store, sync client and
//! the typed APIs together.

use std::sync::Arc;
use thiserror::Error;

use super::config::{ClientConfig, ConfigError};
use crate::adapters::{FileCredentialsProvider, ReqwestHttpClient};
use crate::auth::{AuthSession, LogoutNotifier};
use crate::exam::ExamApi;
use crate::sync::SyncClient;
use crate::traits::{CredentialsProvider, HttpClient, HttpError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Transport(HttpError),
}

/// Everything a front end needs, sharing one [`SyncClient`].
///
/// The [`LogoutNotifier`] is owned here; front ends register their
/// session-loss handler on it.
pub struct AppContext {
    pub config: ClientConfig,
    pub client: Arc<SyncClient>,
    pub auth: AuthSession,
    pub exams: ExamApi,
    pub logout: Arc<LogoutNotifier>,
}

impl AppContext {
    /// Production wiring: reqwest transport and the file credential store.
    pub fn from_config(config: ClientConfig) -> Result<Self, StartupError> {
        let http =
            ReqwestHttpClient::with_timeout(config.http_timeout).map_err(StartupError::Transport)?;
        let credentials = FileCredentialsProvider::with_path(config.resolve_credentials_path()?);
        Ok(Self::with_parts(config, Arc::new(http), Arc::new(credentials)))
    }

    /// Wire the given transport and store.
    pub fn with_parts(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Self {
        let logout = Arc::new(LogoutNotifier::new());
        let client = Arc::new(SyncClient::new(
            http,
            config.api_url.clone(),
            credentials,
            Arc::clone(&logout),
        ));
        tracing::debug!(api_url = %config.api_url, "Client wired");

        Self {
            auth: AuthSession::new(Arc::clone(&client)),
            exams: ExamApi::new(Arc::clone(&client)),
            client,
            logout,
            config,
        }
    }
}
