//! File-backed [`CredentialsProvider`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::auth::credentials::{Credentials, CredentialsManager};
use crate::traits::{CredentialsError, CredentialsProvider};

/// Credentials provider over a [`CredentialsManager`].
///
/// File I/O is small and synchronous; it runs inline on the calling task.
#[derive(Debug, Clone)]
pub struct FileCredentialsProvider {
    manager: CredentialsManager,
}

impl FileCredentialsProvider {
    /// Provider at the default location, `~/.prepexam/credentials.json`.
    pub fn new() -> Result<Self, CredentialsError> {
        CredentialsManager::new()
            .map(|manager| Self { manager })
            .ok_or_else(|| {
                CredentialsError::Other("Failed to determine home directory".to_string())
            })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            manager: CredentialsManager::with_path(path),
        }
    }

    pub fn credentials_path(&self) -> &Path {
        self.manager.credentials_path()
    }
}

#[async_trait]
impl CredentialsProvider for FileCredentialsProvider {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        self.manager.load()
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        self.manager.save(creds)
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        self.manager.clear()
    }
}
