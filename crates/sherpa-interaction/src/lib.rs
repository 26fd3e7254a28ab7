//! Generative collaborators for the AI Sherpa.
//!
//! - [`GeminiApiAgent`]: text generation over the Gemini REST API
//! - [`GeminiSpeechAgent`]: speech synthesis over the Gemini REST API
//! - [`fallback`]: adapters implementing the core collaborator traits, which
//!   absorb agent errors into fixed fallback values

pub mod error;
pub mod fallback;
mod gemini;
pub mod gemini_api_agent;
pub mod gemini_speech_agent;

pub use error::InteractionError;
pub use fallback::{FallbackSpeechSynthesizer, FallbackTextGenerator, SpeechAgent, TextAgent};
pub use gemini_api_agent::GeminiApiAgent;
pub use gemini_speech_agent::GeminiSpeechAgent;
