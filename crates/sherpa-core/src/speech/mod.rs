//! Speech playback domain module.
//!
//! # Module Structure
//!
//! - `pcm`: PCM16 decoding and the playable [`AudioBuffer`]
//! - `synthesizer`: Synthesis and playback collaborator traits
//! - `player`: Single-flight speech playback pipeline

mod pcm;
mod player;
mod synthesizer;

pub use pcm::{AudioBuffer, AudioError, AudioFormat, PCM16_SCALE, decode_base64, pcm16_to_f32};
pub use player::{PlaybackResult, SpeakOutcome, SpeechPlayer};
pub use synthesizer::{AudioSink, SpeechSynthesizer};
