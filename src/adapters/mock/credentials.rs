//! In-memory credentials provider for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::auth::credentials::Credentials;
use crate::traits::{CredentialsError, CredentialsProvider};

/// In-memory credential store with injectable failures.
///
/// Clones share state, so a test can keep a handle and inspect what the
/// code under test wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    credentials: Arc<Mutex<Option<Credentials>>>,
    save_should_fail: Arc<Mutex<bool>>,
    load_should_fail: Arc<Mutex<bool>>,
    clear_should_fail: Arc<Mutex<bool>>,
    clear_calls: Arc<AtomicUsize>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with initial credentials.
    pub fn with_credentials(creds: Credentials) -> Self {
        let provider = Self::new();
        provider.set_credentials(Some(creds));
        provider
    }

    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    pub fn set_clear_should_fail(&self, should_fail: bool) {
        *self.clear_should_fail.lock().unwrap() = should_fail;
    }

    /// Get the current credentials synchronously.
    pub fn get_credentials(&self) -> Option<Credentials> {
        self.credentials.lock().unwrap().clone()
    }

    /// Set credentials synchronously.
    pub fn set_credentials(&self, creds: Option<Credentials>) {
        *self.credentials.lock().unwrap() = creds;
    }

    /// How many times `clear` was called, successful or not.
    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialsProvider for InMemoryCredentials {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(CredentialsError::LoadFailed("Mock load failure".to_string()));
        }
        Ok(self.credentials.lock().unwrap().clone())
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(CredentialsError::SaveFailed("Mock save failure".to_string()));
        }
        *self.credentials.lock().unwrap() = Some(creds.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        if *self.clear_should_fail.lock().unwrap() {
            return Err(CredentialsError::ClearFailed("Mock clear failure".to_string()));
        }
        *self.credentials.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_clear() {
        let provider = InMemoryCredentials::new();
        assert!(provider.load().await.unwrap().is_none());

        provider.save(&Credentials::new("tok", None)).await.unwrap();
        assert_eq!(provider.load().await.unwrap().unwrap().access_token, "tok");

        provider.clear().await.unwrap();
        assert!(provider.load().await.unwrap().is_none());
        assert_eq!(provider.clear_calls(), 1);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let provider = InMemoryCredentials::new();
        provider.set_load_should_fail(true);
        provider.set_save_should_fail(true);
        provider.set_clear_should_fail(true);

        assert!(matches!(provider.load().await, Err(CredentialsError::LoadFailed(_))));
        assert!(matches!(
            provider.save(&Credentials::default()).await,
            Err(CredentialsError::SaveFailed(_))
        ));
        assert!(matches!(provider.clear().await, Err(CredentialsError::ClearFailed(_))));
    }

    #[test]
    fn test_clones_share_state() {
        let provider = InMemoryCredentials::with_credentials(Credentials::new("shared", None));
        let cloned = provider.clone();
        provider.set_credentials(None);
        assert!(cloned.get_credentials().is_none());
    }
}
