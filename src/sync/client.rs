//! Authenticated request client with single-flight token renewal.

use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};

use super::endpoint::{Method, RequestSpec, REFRESH_PATH};
use super::renewal::{RenewalGate, Ticket};
use crate::auth::api::RefreshResponse;
use crate::auth::{Credentials, LogoutNotifier, LogoutReason};
use crate::error::{SyncError, SyncResult};
use crate::traits::{CredentialsProvider, Headers, HttpClient, Response};

/// Statuses from the renewal endpoint that mean the session cannot be saved.
const UNRECOVERABLE_RENEWAL_STATUSES: [u16; 3] = [400, 401, 403];

/// Wraps every call to the remote service.
///
/// Attaches the bearer token, and on a 401 from a non-auth endpoint renews
/// the token once (shared by all concurrent callers) and replays the call.
/// When renewal is refused the credential is cleared, the logout observer
/// fires once, and callers receive [`SyncError::SessionExpired`].
pub struct SyncClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    token: RwLock<Option<String>>,
    credentials: Arc<dyn CredentialsProvider>,
    logout: Arc<LogoutNotifier>,
    renewal: RenewalGate,
}

impl SyncClient {
    pub fn new(
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialsProvider>,
        logout: Arc<LogoutNotifier>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            credentials,
            logout,
            renewal: RenewalGate::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current in-memory token. This copy is authoritative for requests.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn has_token(&self) -> bool {
        self.token.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Replace the in-memory token without touching the store.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn is_renewing(&self) -> bool {
        self.renewal.is_renewing()
    }

    pub fn logout_notifier(&self) -> &Arc<LogoutNotifier> {
        &self.logout
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialsProvider> {
        &self.credentials
    }

    /// Perform `spec`, renewing the token at most once on expiry.
    pub async fn request(&self, spec: &RequestSpec) -> SyncResult<Response> {
        let token = self.token();
        let response = self.dispatch(spec, token.as_deref()).await?;

        if response.status != 401 || spec.bypasses_renewal() {
            return classify(response);
        }

        tracing::debug!(path = %spec.path, "Access token rejected, renewing");
        let renewed = self.renew(token).await?;

        let replay = self.dispatch(spec, Some(&renewed)).await?;
        if replay.status == 401 {
            tracing::warn!(path = %spec.path, "Renewed token rejected on replay");
            self.expire_session(Some(&renewed), LogoutReason::TokenRejectedAfterRenewal)
                .await;
            return Err(SyncError::SessionExpired);
        }
        classify(replay)
    }

    /// Perform `spec` and decode a JSON success body.
    pub async fn request_json<T: DeserializeOwned>(&self, spec: &RequestSpec) -> SyncResult<T> {
        let response = self.request(spec).await?;
        response
            .json()
            .map_err(|e| SyncError::invalid_body(response.status, e))
    }

    /// Obtain a fresh token, either by leading the renewal or by waiting for
    /// the one in flight.
    async fn renew(&self, failed_token: Option<String>) -> SyncResult<String> {
        match self.renewal.enter() {
            Ticket::Follower(rx) => rx.await.unwrap_or_else(|_| {
                Err(SyncError::Network {
                    message: "token renewal was cancelled".to_string(),
                })
            }),
            Ticket::Leader(lease) => {
                // Our request may have left before an earlier episode
                // finished; reuse its outcome rather than renewing twice.
                let current = self.token();
                if current != failed_token {
                    let result = match current {
                        Some(token) => Ok(token),
                        None => Err(SyncError::SessionExpired),
                    };
                    lease.finish(result.clone());
                    return result;
                }

                let result = self.perform_renewal(failed_token).await;
                lease.finish(result.clone());
                result
            }
        }
    }

    async fn perform_renewal(&self, last_token: Option<String>) -> SyncResult<String> {
        let Some(last_token) = last_token else {
            self.expire_session(None, LogoutReason::NoCredential).await;
            return Err(SyncError::SessionExpired);
        };

        tracing::info!("Renewing access token");
        let spec = RequestSpec::post(REFRESH_PATH, serde_json::json!({}));
        let response = match self.dispatch(&spec, Some(&last_token)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Token renewal failed without response: {}", e);
                return Err(e.into());
            }
        };

        if response.is_success() {
            let body: RefreshResponse = response
                .json()
                .map_err(|e| SyncError::invalid_body(response.status, e))?;
            self.store_token(&body.token).await;
            tracing::info!("Access token renewed");
            return Ok(body.token);
        }

        if UNRECOVERABLE_RENEWAL_STATUSES.contains(&response.status) {
            tracing::warn!(status = response.status, "Token renewal refused");
            self.expire_session(Some(&last_token), LogoutReason::RenewalRejected {
                status: response.status,
            })
            .await;
            return Err(SyncError::SessionExpired);
        }

        tracing::warn!(status = response.status, "Token renewal failed");
        Err(match classify(response) {
            Err(e) => e,
            Ok(response) => SyncError::Server {
                status: response.status,
                message: "unexpected renewal response".to_string(),
            },
        })
    }

    /// Memory first, then the store. A store failure is logged, not fatal.
    async fn store_token(&self, token: &str) {
        self.set_token(Some(token.to_string()));

        let updated = match self.credentials.load().await {
            Ok(Some(existing)) => existing.with_token(token),
            Ok(None) => Credentials::new(token, None),
            Err(e) => {
                tracing::warn!("Could not read stored credentials: {}", e);
                Credentials::new(token, None)
            }
        };
        if let Err(e) = self.credentials.save(&updated).await {
            tracing::warn!("Could not persist renewed token: {}", e);
        }
    }

    /// Clear the credential and notify logout, once per episode.
    ///
    /// Only the caller whose `expected` token is still current does the
    /// clearing; callers that lost the race just see the session gone.
    async fn expire_session(&self, expected: Option<&str>, reason: LogoutReason) {
        {
            let mut current = self.token.write().unwrap_or_else(|e| e.into_inner());
            if current.as_deref() != expected {
                tracing::debug!(%reason, "Session already expired by another caller");
                return;
            }
            *current = None;
        }
        if let Err(e) = self.credentials.clear().await {
            tracing::warn!("Could not clear stored credentials: {}", e);
        }
        self.logout.notify(reason);
    }

    async fn dispatch(
        &self,
        spec: &RequestSpec,
        token: Option<&str>,
    ) -> Result<Response, crate::traits::HttpError> {
        let url = format!("{}{}", self.base_url, spec.path);
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(token) = token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }

        tracing::trace!(method = spec.method.as_str(), %url, "Dispatching request");
        match spec.method {
            Method::Get => self.http.get(&url, &headers).await,
            Method::Post => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                self.http.post(&url, &spec.body_string(), &headers).await
            }
        }
    }
}

impl std::fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.has_token())
            .field("renewing", &self.is_renewing())
            .finish()
    }
}

/// Map a response to the caller-facing taxonomy.
fn classify(response: Response) -> SyncResult<Response> {
    if response.is_success() {
        return Ok(response);
    }

    let status = response.status;
    let message = response.error_message();
    match (status, message) {
        (400..=499, Some(message)) => Err(SyncError::Validation { status, message }),
        (_, Some(message)) => Err(SyncError::Server { status, message }),
        (_, None) => Err(SyncError::Server {
            status,
            message: response
                .text()
                .ok()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown error".to_string()),
        }),
    }
}
