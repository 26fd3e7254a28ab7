//! Secret configuration file storage.
//!
//! Loads `secret.json` from the Sherpa config directory.

use std::fs;
use std::path::{Path, PathBuf};

use sherpa_core::config::SecretConfig;

use crate::paths::SherpaPaths;

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Secret file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Secret file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            // serde_json errors only carry line/column, never the offending value
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

/// Read-only storage for `secret.json`.
///
/// # Security Note
///
/// The file is plaintext JSON. Keep its permissions at 600.
#[derive(Debug, Clone)]
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Resolves `secret.json` through [`SherpaPaths`].
    pub fn new(paths: &SherpaPaths) -> Result<Self, SecretStorageError> {
        let path = paths
            .secret_file()
            .map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads and parses the secret file.
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let storage = SecretStorage::with_path(temp.path().join("secret.json"));

        assert!(!storage.exists());
        assert!(matches!(storage.load(), Err(SecretStorageError::NotFound(_))));
    }

    #[test]
    fn test_load_parses_both_sections() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("secret.json");
        fs::write(
            &path,
            r#"{
                "gemini": {"api_key": "g-key", "model_name": "gemini-2.5-flash"},
                "supabase": {"url": "https://demo.supabase.co", "anon_key": "anon"}
            }"#,
        )
        .unwrap();

        let secrets = SecretStorage::with_path(path).load().unwrap();
        assert_eq!(secrets.gemini.unwrap().api_key, "g-key");
        assert_eq!(secrets.supabase.unwrap().url, "https://demo.supabase.co");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        fs::write(temp.path(), "{ not json").unwrap();

        let storage = SecretStorage::with_path(temp.path().to_path_buf());
        assert!(matches!(storage.load(), Err(SecretStorageError::ParseError(_))));
    }
}
