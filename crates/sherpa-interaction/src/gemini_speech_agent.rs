//! GeminiSpeechAgent - speech synthesis through the Gemini TTS models.
//!
//! The response carries 16-bit mono PCM at 24 kHz as base64 in `inlineData`.
//! The payload is returned untouched; decoding happens in
//! `sherpa_core::speech`.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use sherpa_core::config::{GeminiSecret, SpeechSettings};

use crate::error::InteractionError;
use crate::fallback::SpeechAgent;
use crate::gemini::{
    self, BASE_URL, Content, GenerateContentRequest, GenerationConfig, PrebuiltVoiceConfig,
    SpeechConfig, VoiceConfig,
};

pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VOICE: &str = "Kore";

/// Agent implementation that asks Gemini to speak a piece of text.
#[derive(Clone)]
pub struct GeminiSpeechAgent {
    client: Client,
    api_key: String,
    model: String,
    voice: String,
    base_url: String,
}

impl GeminiSpeechAgent {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_TTS_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn from_settings(secret: &GeminiSecret, settings: &SpeechSettings) -> Self {
        Self::new(secret.api_key.clone())
            .with_model(settings.model.clone())
            .with_voice(settings.voice.clone())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, InteractionError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| InteractionError::ProcessError {
                status_code: None,
                message: format!("Failed to build HTTP client: {err}"),
                is_retryable: false,
                retry_after: None,
            })?;
        Ok(self)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Selects one of the prebuilt voices (e.g. "Kore", "Puck").
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    fn build_request(&self, text: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(None, text)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                }),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl SpeechAgent for GeminiSpeechAgent {
    async fn synthesize(&self, text: &str) -> Result<String, InteractionError> {
        let request = self.build_request(text);
        let response = gemini::generate_content(
            &self.client,
            &self.base_url,
            &self.api_key,
            &self.model,
            &request,
        )
        .await?;
        response.into_inline_data()
    }
}
