//! Credential store trait abstraction.
//!
//! The access token and cached user record survive restarts through a
//! [`CredentialsProvider`]. The core treats it as a black box whose
//! operations may fail.

use async_trait::async_trait;

use crate::auth::Credentials;

/// Credential store errors.
#[derive(Debug, Clone)]
pub enum CredentialsError {
    /// Failed to load credentials
    LoadFailed(String),
    /// Failed to save credentials
    SaveFailed(String),
    /// Failed to clear credentials
    ClearFailed(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::LoadFailed(msg) => write!(f, "Failed to load credentials: {}", msg),
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credentials: {}", msg),
            CredentialsError::ClearFailed(msg) => {
                write!(f, "Failed to clear credentials: {}", msg)
            }
            CredentialsError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            CredentialsError::Other(msg) => write!(f, "Credentials error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Durable storage for the access token and cached user.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Load credentials from storage.
    ///
    /// # Returns
    /// - `Ok(Some(credentials))` if credentials exist and were loaded successfully
    /// - `Ok(None)` if no credentials are stored
    /// - `Err(error)` if loading failed
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError>;

    /// Save credentials, replacing whatever was stored.
    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError>;

    /// Clear all stored credentials. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), CredentialsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_error_display() {
        assert_eq!(
            CredentialsError::LoadFailed("read error".to_string()).to_string(),
            "Failed to load credentials: read error"
        );
        assert_eq!(
            CredentialsError::SaveFailed("write error".to_string()).to_string(),
            "Failed to save credentials: write error"
        );
        assert_eq!(
            CredentialsError::ClearFailed("delete error".to_string()).to_string(),
            "Failed to clear credentials: delete error"
        );
        assert_eq!(
            CredentialsError::Serialization("invalid json".to_string()).to_string(),
            "Serialization error: invalid json"
        );
    }

    #[test]
    fn test_credentials_error_implements_error_trait() {
        let err = CredentialsError::Other("x".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
