//! Text-generation collaborator.

use serde::{Deserialize, Serialize};

/// Returned when the collaborator produced no text.
pub const EMPTY_REPLY_FALLBACK: &str = "I couldn't generate a response. Please try again.";

/// Returned when the collaborator could not be reached or failed.
pub const UNAVAILABLE_FALLBACK: &str =
    "Sorry, the AI Sherpa is having trouble connecting right now. Please try again.";

/// Which generation configuration a request should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningMode {
    /// Low-latency model, no extended thinking.
    #[default]
    Fast,
    /// Higher-latency model with extended thinking.
    Deep,
}

impl ReasoningMode {
    pub fn is_deep(&self) -> bool {
        matches!(self, Self::Deep)
    }
}

/// Completes a prompt into plain text.
///
/// Implementations never fail past this boundary: transport and provider
/// errors are converted into one of the fallback strings above.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        mode: ReasoningMode,
    ) -> String;
}
