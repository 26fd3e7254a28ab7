//! Configuration models.
//!
//! Two files live in the Sherpa config directory:
//! - `secret.json`: API keys and service URLs ([`SecretConfig`])
//! - `config.toml`: tunable settings ([`AppConfig`]), every field optional

use serde::{Deserialize, Serialize};

use crate::speech::AudioFormat;

/// Root structure of secret.json
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
    #[serde(default)]
    pub supabase: Option<SupabaseSecret>,
}

/// Gemini API credentials
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeminiSecret {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Supabase project credentials (public anon key)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupabaseSecret {
    pub url: String,
    pub anon_key: String,
}

/// Root structure of config.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// tracing filter directive, e.g. "info" or "sherpa_core=debug"
    pub log_level: Option<String>,
    pub chat: ChatSettings,
    pub speech: SpeechSettings,
    pub enquiry: EnquirySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ChatSettings {
    pub fast_model: String,
    pub deep_model: String,
    /// Thinking token budget for deep reasoning requests.
    pub deep_thinking_budget: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            fast_model: "gemini-2.5-flash".to_string(),
            deep_model: "gemini-2.5-pro".to_string(),
            deep_thinking_budget: 32_768,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SpeechSettings {
    pub model: String,
    pub voice: String,
    pub sample_rate: u32,
    pub channels: u16,
    /// Where the CLI sink writes WAV files. Defaults to `<data dir>/speech`.
    pub output_dir: Option<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        let format = AudioFormat::default();
        Self {
            model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Kore".to_string(),
            sample_rate: format.sample_rate,
            channels: format.channels,
            output_dir: None,
        }
    }
}

impl SpeechSettings {
    pub fn format(&self) -> AudioFormat {
        AudioFormat {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EnquirySettings {
    /// PostgREST table receiving enquiries.
    pub table: String,
    pub timeout_secs: u64,
}

impl Default for EnquirySettings {
    fn default() -> Self {
        Self {
            table: "enquiries".to_string(),
            timeout_secs: 15,
        }
    }
}
