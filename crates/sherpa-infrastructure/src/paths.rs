//! Unified path management for Sherpa configuration files.
//!
//! Paths resolve under the platform config/data directories from `dirs`,
//! or under an explicit base directory (tests, portable installs).

use std::path::{Path, PathBuf};

use sherpa_core::config::{GeminiSecret, SecretConfig, SupabaseSecret};

const APP_DIR: &str = "sherpa";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path resolver for Sherpa.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/sherpa/            # Config directory
/// ├── config.toml              # Tunable settings
/// ├── secret.json              # API keys and Supabase credentials
/// └── logs/                    # Daily rolling logs
///     └── sherpa.log.YYYY-MM-DD
///
/// ~/.local/share/sherpa/       # Data directory
/// └── speech/                  # WAV files written by the CLI sink
/// ```
///
/// With a base directory, both trees collapse into `<base>/`.
#[derive(Debug, Clone, Default)]
pub struct SherpaPaths {
    base: Option<PathBuf>,
}

impl SherpaPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the Sherpa configuration directory (e.g. `~/.config/sherpa/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the Sherpa data directory (e.g. `~/.local/share/sherpa/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600).
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    /// Default output directory for synthesized speech.
    pub fn speech_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("speech"))
    }

    /// Ensures the secret file exists, creating a template if it doesn't.
    ///
    /// The template has empty keys for every service. On Unix the file is
    /// created with mode 600.
    pub fn ensure_secret_file(&self) -> Result<PathBuf, std::io::Error> {
        let secret_path = self
            .secret_file()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;

        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            gemini: Some(GeminiSecret {
                api_key: String::new(),
                model_name: None,
            }),
            supabase: Some(SupabaseSecret {
                url: String::new(),
                anon_key: String::new(),
            }),
        };
        let template_json = serde_json::to_string_pretty(&template).map_err(std::io::Error::other)?;
        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&secret_path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(secret_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dirs_end_with_app_name() {
        let paths = SherpaPaths::default();
        if let Ok(config_dir) = paths.config_dir() {
            assert!(config_dir.ends_with("sherpa"));
            assert!(paths.secret_file().unwrap().starts_with(&config_dir));
            assert!(paths.logs_dir().unwrap().ends_with("sherpa/logs"));
        }
    }

    #[test]
    fn test_base_dir_overrides_platform_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let paths = SherpaPaths::new(Some(temp.path()));

        assert_eq!(paths.config_file().unwrap(), temp.path().join("config.toml"));
        assert_eq!(paths.secret_file().unwrap(), temp.path().join("secret.json"));
        assert_eq!(paths.speech_dir().unwrap(), temp.path().join("speech"));
    }

    #[test]
    fn test_ensure_secret_file_writes_template_once() {
        let temp = tempfile::tempdir().unwrap();
        let paths = SherpaPaths::new(Some(&temp.path().join("nested")));

        let path = paths.ensure_secret_file().unwrap();
        let template: SecretConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(template.gemini.unwrap().api_key, "");

        std::fs::write(&path, r#"{"gemini": {"api_key": "kept"}}"#).unwrap();
        paths.ensure_secret_file().unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("kept"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
