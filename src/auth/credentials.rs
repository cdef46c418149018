//! Credential records and their on-disk JSON file.
//!
//! The default location is `~/.prepexam/credentials.json`.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::traits::CredentialsError;

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".prepexam";

/// The credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// User record cached next to the token so screens can render without a
/// round trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Persisted authentication state: an opaque bearer token plus the user it
/// belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    /// Opaque bearer token.
    pub access_token: String,
    /// Cached identity of the signed-in user.
    #[serde(default)]
    pub user: Option<CachedUser>,
    /// When these credentials were written (Unix seconds).
    #[serde(default)]
    pub saved_at: Option<i64>,
}

impl Credentials {
    /// Create credentials for a freshly issued token.
    pub fn new(access_token: impl Into<String>, user: Option<CachedUser>) -> Self {
        Self {
            access_token: access_token.into(),
            user,
            saved_at: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// Check if the credentials carry a usable token.
    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Return a copy with the token replaced, keeping the cached user.
    pub fn with_token(&self, access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user: self.user.clone(),
            saved_at: Some(chrono::Utc::now().timestamp()),
        }
    }
}

/// Reads and writes the credentials JSON file.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Create a manager for the default location in the home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::with_path(home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE)))
    }

    /// Create a manager for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: path.into(),
        }
    }

    /// Default credentials path, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load credentials from the file.
    ///
    /// A missing file, unreadable JSON, or an empty token all load as `None`;
    /// a corrupt file must not lock the user out of signing in again.
    pub fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        if !self.credentials_path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.credentials_path)
            .map_err(|e| CredentialsError::LoadFailed(e.to_string()))?;

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, Credentials>(reader) {
            Ok(creds) if creds.has_token() => Ok(Some(creds)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(
                    path = %self.credentials_path.display(),
                    "Ignoring unreadable credentials file: {}",
                    e
                );
                Ok(None)
            }
        }
    }

    /// Save credentials, creating the parent directory if needed.
    pub fn save(&self, credentials: &Credentials) -> Result<(), CredentialsError> {
        if let Some(parent) = self.credentials_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
            }
        }

        let file = File::create(&self.credentials_path)
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credentials)
            .map_err(|e| CredentialsError::Serialization(e.to_string()))?;

        writer
            .flush()
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }

    /// Remove the credentials file. Succeeds if it never existed.
    pub fn clear(&self) -> Result<(), CredentialsError> {
        if !self.credentials_path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.credentials_path)
            .map_err(|e| CredentialsError::ClearFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> CredentialsManager {
        CredentialsManager::with_path(temp_dir.path().join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
    }

    fn sample_credentials() -> Credentials {
        Credentials::new(
            "token-abc",
            Some(CachedUser {
                id: "42".to_string(),
                name: Some("Ada".to_string()),
                email: Some("ada@example.com".to_string()),
            }),
        )
    }

    #[test]
    fn test_credentials_new_stamps_saved_at() {
        let creds = Credentials::new("t", None);
        assert!(creds.saved_at.is_some());
        assert!(creds.has_token());
    }

    #[test]
    fn test_credentials_default_has_no_token() {
        assert!(!Credentials::default().has_token());
    }

    #[test]
    fn test_with_token_keeps_user() {
        let creds = sample_credentials();
        let renewed = creds.with_token("token-new");
        assert_eq!(renewed.access_token, "token-new");
        assert_eq!(renewed.user, creds.user);
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        assert_eq!(manager.load().unwrap(), None);
    }

    #[test]
    fn test_save_creates_parent_and_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        assert!(!manager.credentials_path().parent().unwrap().exists());

        let creds = sample_credentials();
        manager.save(&creds).unwrap();

        assert!(manager.credentials_path().exists());
        assert_eq!(manager.load().unwrap(), Some(creds));
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        manager.save(&sample_credentials()).unwrap();

        manager.clear().unwrap();
        assert!(!manager.credentials_path().exists());
        assert_eq!(manager.load().unwrap(), None);
    }

    #[test]
    fn test_clear_nonexistent_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        assert!(manager.clear().is_ok());
    }

    #[test]
    fn test_load_invalid_json_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::create_dir_all(manager.credentials_path().parent().unwrap()).unwrap();
        fs::write(manager.credentials_path(), "not valid json").unwrap();

        assert_eq!(manager.load().unwrap(), None);
    }

    #[test]
    fn test_load_empty_token_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        manager.save(&Credentials::default()).unwrap();
        assert_eq!(manager.load().unwrap(), None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{
            "access_token": "old-token",
            "user": {"id": "7"},
            "theme": "dark"
        }"#;
        let creds: Credentials = serde_json::from_str(json).unwrap();
        assert_eq!(creds.access_token, "old-token");
        assert_eq!(creds.user.unwrap().id, "7");
        assert!(creds.saved_at.is_none());
    }
}
