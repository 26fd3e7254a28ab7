//! Errors raised by the Gemini agents.
//!
//! These never reach the chat or speech controllers: the fallback adapters in
//! [`crate::fallback`] turn them into fixed replies.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// Transport failure or non-success HTTP status.
    #[error("request failed ({status_code:?}): {message}")]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The provider answered but produced no usable content.
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// The provider answered with a body we could not parse.
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl InteractionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProcessError { is_retryable: true, .. })
    }

    /// Delay the provider asked for before trying again.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::ProcessError { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn is_empty_response(&self) -> bool {
        matches!(self, Self::EmptyResponse(_))
    }
}
