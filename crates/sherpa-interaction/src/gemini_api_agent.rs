//! GeminiApiAgent - Direct REST API implementation for Gemini text generation.
//!
//! One agent instance is bound to one model. The AI Sherpa uses two: a fast
//! `gemini-2.5-flash` agent and a deep reasoning agent with a thinking budget.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use sherpa_core::config::{ChatSettings, GeminiSecret};

use crate::error::InteractionError;
use crate::fallback::TextAgent;
use crate::gemini::{
    self, BASE_URL, Content, GenerateContentRequest, GenerationConfig, ThinkingConfig,
};

/// Agent implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    thinking_budget: Option<u32>,
}

impl GeminiApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
            thinking_budget: None,
        }
    }

    /// Builds the fast agent from secrets and chat settings.
    ///
    /// `model_name` in secret.json, when present, overrides the configured
    /// fast model.
    pub fn fast(secret: &GeminiSecret, settings: &ChatSettings) -> Result<Self, InteractionError> {
        let model = secret
            .model_name
            .clone()
            .unwrap_or_else(|| settings.fast_model.clone());
        Self::new(secret.api_key.clone(), model)
            .with_timeout(Duration::from_secs(settings.timeout_secs))
    }

    /// Builds the deep reasoning agent from secrets and chat settings.
    pub fn deep(secret: &GeminiSecret, settings: &ChatSettings) -> Result<Self, InteractionError> {
        Self::new(secret.api_key.clone(), settings.deep_model.clone())
            .with_thinking_budget(settings.deep_thinking_budget)
            .with_timeout(Duration::from_secs(settings.timeout_secs))
    }

    /// Points the agent at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Enables extended thinking with the given token budget.
    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    /// Rebuilds the HTTP client with a request timeout.
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

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(Some("user"), prompt)],
            system_instruction: system_instruction.map(|text| Content::text(None, text)),
            generation_config: self.thinking_budget.map(|budget| GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: budget,
                }),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl TextAgent for GeminiApiAgent {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<String, InteractionError> {
        let request = self.build_request(prompt, system_instruction);
        let response = gemini::generate_content(
            &self.client,
            &self.base_url,
            &self.api_key,
            &self.model,
            &request,
        )
        .await?;
        response.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn secret() -> GeminiSecret {
        GeminiSecret {
            api_key: "test-key".to_string(),
            model_name: None,
        }
    }

    #[test]
    fn test_fast_agent_has_no_thinking_config() {
        let agent = GeminiApiAgent::fast(&secret(), &ChatSettings::default()).unwrap();
        assert_eq!(agent.model(), "gemini-2.5-flash");

        let value = serde_json::to_value(agent.build_request("hi", Some("sys"))).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
                "systemInstruction": {"parts": [{"text": "sys"}]}
            })
        );
    }

    #[test]
    fn test_deep_agent_requests_thinking_budget() {
        let agent = GeminiApiAgent::deep(&secret(), &ChatSettings::default()).unwrap();
        assert_eq!(agent.model(), "gemini-2.5-pro");

        let value = serde_json::to_value(agent.build_request("hi", None)).unwrap();
        assert_eq!(
            value["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            json!(32_768)
        );
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn test_secret_model_name_overrides_fast_model() {
        let secret = GeminiSecret {
            api_key: "k".to_string(),
            model_name: Some("gemini-2.5-flash-lite".to_string()),
        };
        let agent = GeminiApiAgent::fast(&secret, &ChatSettings::default()).unwrap();
        assert_eq!(agent.model(), "gemini-2.5-flash-lite");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_process_error() {
        let agent = GeminiApiAgent::new("k", "gemini-2.5-flash")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2))
            .unwrap();

        let err = agent.generate("hi", None).await.unwrap_err();
        assert!(matches!(
            err,
            InteractionError::ProcessError {
                status_code: None,
                ..
            }
        ));
    }
}
