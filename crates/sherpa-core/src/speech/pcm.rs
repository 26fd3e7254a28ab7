//! Raw PCM decoding.
//!
//! The speech collaborator returns 16-bit signed little-endian PCM encoded as
//! base64. This module turns that payload into normalized `f32` samples laid
//! out per channel.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Divisor for i16 → f32 normalization. 32768, not 32767, so that
/// `i16::MIN` maps to exactly -1.0.
pub const PCM16_SCALE: f32 = 32768.0;

/// Errors raised while decoding or playing synthesized audio.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("invalid base64 audio payload: {0}")]
    InvalidEncoding(String),
    #[error("PCM16 payload has an odd number of bytes ({0})")]
    OddByteCount(usize),
    #[error("channel count must be at least 1")]
    NoChannels,
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,
    #[error("audio sink failed: {0}")]
    Sink(String),
}

/// Sample rate and channel layout of a PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioFormat {
    /// 24 kHz mono, what the Gemini TTS models emit.
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
        }
    }
}

/// Decodes the transport encoding into raw PCM bytes.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, AudioError> {
    BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| AudioError::InvalidEncoding(e.to_string()))
}

/// Reinterprets byte pairs as i16 LE and rescales them into [-1.0, 1.0).
pub fn pcm16_to_f32(bytes: &[u8]) -> Result<Vec<f32>, AudioError> {
    if bytes.len() % 2 != 0 {
        return Err(AudioError::OddByteCount(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / PCM16_SCALE)
        .collect())
}

/// A decoded, playable block of audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    /// One vector of samples per channel, all the same length.
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Builds a buffer from interleaved PCM16 bytes.
    ///
    /// Samples are dealt to channels round-robin. A trailing partial frame is
    /// dropped.
    pub fn from_pcm16(bytes: &[u8], format: AudioFormat) -> Result<Self, AudioError> {
        if format.channels == 0 {
            return Err(AudioError::NoChannels);
        }
        if format.sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate);
        }

        let samples = pcm16_to_f32(bytes)?;
        let channel_count = usize::from(format.channels);
        let frames = samples.len() / channel_count;

        let channels = (0..channel_count)
            .map(|channel| {
                (0..frames)
                    .map(|frame| samples[frame * channel_count + channel])
                    .collect()
            })
            .collect();

        Ok(Self {
            sample_rate: format.sample_rate,
            channels,
        })
    }

    /// Decodes a base64 PCM16 payload straight into a buffer.
    pub fn from_base64(payload: &str, format: AudioFormat) -> Result<Self, AudioError> {
        let bytes = decode_base64(payload)?;
        Self::from_pcm16(&bytes, format)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        // Built from a u16 in `from_pcm16`
        self.channels.len() as u16
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Samples re-interleaved frame by frame.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frames() * self.channels.len());
        for frame in 0..self.frames() {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }
}
