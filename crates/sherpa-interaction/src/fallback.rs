//! Boundary adapters between the Gemini agents and the core collaborator
//! traits.
//!
//! Agents report failures as [`InteractionError`]. The adapters log them and
//! substitute the fixed fallback values the chat and speech controllers
//! expect, so no error crosses into `sherpa_core`.

use std::sync::Arc;

use async_trait::async_trait;

use sherpa_core::chat::{EMPTY_REPLY_FALLBACK, ReasoningMode, TextGenerator, UNAVAILABLE_FALLBACK};
use sherpa_core::speech::SpeechSynthesizer;

use crate::error::InteractionError;

/// A single text-generation backend.
#[async_trait]
pub trait TextAgent: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<String, InteractionError>;
}

/// A single speech-synthesis backend returning base64 PCM16.
#[async_trait]
pub trait SpeechAgent: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<String, InteractionError>;
}

/// Log suffix telling whether the provider expects a later retry to succeed.
fn retry_hint(err: &InteractionError) -> String {
    match (err.is_retryable(), err.retry_after()) {
        (true, Some(after)) => format!(" (retryable after {}s)", after.as_secs()),
        (true, None) => " (retryable)".to_string(),
        (false, _) => String::new(),
    }
}

/// Routes requests to the fast or deep agent by [`ReasoningMode`].
pub struct FallbackTextGenerator {
    fast: Arc<dyn TextAgent>,
    deep: Arc<dyn TextAgent>,
}

impl FallbackTextGenerator {
    pub fn new(fast: Arc<dyn TextAgent>, deep: Arc<dyn TextAgent>) -> Self {
        Self { fast, deep }
    }

    /// Uses one agent for both modes.
    pub fn single(agent: Arc<dyn TextAgent>) -> Self {
        Self {
            fast: agent.clone(),
            deep: agent,
        }
    }

    fn agent(&self, mode: ReasoningMode) -> &Arc<dyn TextAgent> {
        match mode {
            ReasoningMode::Fast => &self.fast,
            ReasoningMode::Deep => &self.deep,
        }
    }
}

#[async_trait]
impl TextGenerator for FallbackTextGenerator {
    async fn complete(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        mode: ReasoningMode,
    ) -> String {
        match self.agent(mode).generate(prompt, system_instruction).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("[TextGenerator] Empty reply (mode={:?})", mode);
                EMPTY_REPLY_FALLBACK.to_string()
            }
            Err(err) if err.is_empty_response() => {
                tracing::warn!("[TextGenerator] {} (mode={:?})", err, mode);
                EMPTY_REPLY_FALLBACK.to_string()
            }
            Err(err) => {
                tracing::error!(
                    "[TextGenerator] Generation failed (mode={:?}): {}{}",
                    mode,
                    err,
                    retry_hint(&err)
                );
                UNAVAILABLE_FALLBACK.to_string()
            }
        }
    }
}

/// Absorbs speech failures into `None`.
pub struct FallbackSpeechSynthesizer {
    agent: Arc<dyn SpeechAgent>,
}

impl FallbackSpeechSynthesizer {
    pub fn new(agent: Arc<dyn SpeechAgent>) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl SpeechSynthesizer for FallbackSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Option<String> {
        match self.agent.synthesize(text).await {
            Ok(audio) => Some(audio),
            Err(err) => {
                tracing::error!("[SpeechSynthesizer] Synthesis failed: {}{}", err, retry_hint(&err));
                None
            }
        }
    }
}
