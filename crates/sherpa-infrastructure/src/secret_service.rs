//! Secret service implementation.
//!
//! Reads `secret.json` and layers environment variables on top of it.

use std::sync::{Arc, RwLock};

use sherpa_core::SherpaError;
use sherpa_core::config::{GeminiSecret, SecretConfig, SupabaseSecret};
use sherpa_core::error::Result;
use sherpa_core::secret::SecretService;

use crate::storage::{SecretStorage, SecretStorageError};

/// Credentials taken from the process environment.
///
/// `GEMINI_API_KEY` wins over `API_KEY`. Supabase needs both `SUPABASE_URL`
/// and `SUPABASE_ANON_KEY` to replace the file section, otherwise each
/// variable only patches its own field.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub gemini_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|value| !value.is_empty());
        Self {
            gemini_api_key: var("GEMINI_API_KEY").or_else(|| var("API_KEY")),
            supabase_url: var("SUPABASE_URL"),
            supabase_anon_key: var("SUPABASE_ANON_KEY"),
        }
    }

    fn apply(&self, mut secrets: SecretConfig) -> SecretConfig {
        if let Some(api_key) = &self.gemini_api_key {
            match secrets.gemini.as_mut() {
                Some(gemini) => gemini.api_key = api_key.clone(),
                None => {
                    secrets.gemini = Some(GeminiSecret {
                        api_key: api_key.clone(),
                        model_name: None,
                    })
                }
            }
        }

        if let (Some(url), Some(anon_key)) = (&self.supabase_url, &self.supabase_anon_key) {
            secrets.supabase = Some(SupabaseSecret {
                url: url.clone(),
                anon_key: anon_key.clone(),
            });
        } else if let Some(supabase) = secrets.supabase.as_mut() {
            if let Some(url) = &self.supabase_url {
                supabase.url = url.clone();
            }
            if let Some(anon_key) = &self.supabase_anon_key {
                supabase.anon_key = anon_key.clone();
            }
        }

        secrets
    }

    fn is_empty(&self) -> bool {
        self.gemini_api_key.is_none()
            && self.supabase_url.is_none()
            && self.supabase_anon_key.is_none()
    }
}

/// [`SecretService`] backed by `secret.json` plus environment overrides.
///
/// The merged result is cached after the first successful load.
#[derive(Clone)]
pub struct SecretServiceImpl {
    storage: SecretStorage,
    env: EnvOverrides,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    pub fn new(storage: SecretStorage, env: EnvOverrides) -> Self {
        Self {
            storage,
            env,
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    fn load_secrets_internal(&self) -> Result<SecretConfig> {
        if let Ok(cached) = self.secrets.read() {
            if let Some(cached) = cached.as_ref() {
                return Ok(cached.clone());
            }
        }

        let from_file = match self.storage.load() {
            Ok(secrets) => secrets,
            // Environment alone is enough to run
            Err(SecretStorageError::NotFound(path)) if !self.env.is_empty() => {
                tracing::debug!(
                    "[SecretService] {} not found, using environment only",
                    path.display()
                );
                SecretConfig::default()
            }
            Err(e) => return Err(SherpaError::config(e.to_string())),
        };

        let merged = self.env.apply(from_file);
        if let Ok(mut cache) = self.secrets.write() {
            *cache = Some(merged.clone());
        }
        Ok(merged)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.load_secrets_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.storage.exists()
    }
}
