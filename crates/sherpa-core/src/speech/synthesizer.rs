//! Speech collaborators: synthesis and playback.

use super::pcm::{AudioBuffer, AudioError};

/// Synthesizes speech for a piece of text.
///
/// Returns base64-encoded PCM16 audio, or `None` when synthesis failed.
/// Failures are absorbed at this boundary.
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Option<String>;
}

/// Plays decoded audio.
///
/// `play` resolves once playback has finished.
#[async_trait::async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, buffer: AudioBuffer) -> Result<(), AudioError>;
}
