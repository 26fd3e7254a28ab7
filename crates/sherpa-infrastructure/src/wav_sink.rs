//! Audio sink that writes each buffer to a 16-bit PCM WAV file.
//!
//! Used when the binary is built without device playback or the host has no
//! output device; "playing" a reply then means leaving a file the user can
//! open.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use sherpa_core::speech::{AudioBuffer, AudioError, AudioSink, PCM16_SCALE};

const WAV_HEADER_LEN: usize = 44;
const BITS_PER_SAMPLE: u16 = 16;

pub struct WavFileSink {
    dir: PathBuf,
    sequence: AtomicU64,
    last_path: Mutex<Option<PathBuf>>,
}

impl WavFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sequence: AtomicU64::new(0),
            last_path: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recently written file.
    pub fn last_path(&self) -> Option<PathBuf> {
        self.last_path.lock().ok().and_then(|path| path.clone())
    }

    fn next_path(&self) -> PathBuf {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let stamp = Utc::now().format("%Y%m%d-%H%M%S");
        self.dir.join(format!("sherpa-{stamp}-{seq:03}.wav"))
    }
}

/// Encodes a buffer as a RIFF/WAVE file with 16-bit little-endian samples.
pub fn encode_wav(buffer: &AudioBuffer) -> Vec<u8> {
    let channels = buffer.channel_count();
    let sample_rate = buffer.sample_rate();
    let block_align = channels * (BITS_PER_SAMPLE / 8);
    let byte_rate = sample_rate * u32::from(block_align);

    let samples = buffer.interleaved();
    let data_len = (samples.len() * 2) as u32;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + samples.len() * 2);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        let value = (sample * PCM16_SCALE).round().clamp(-32768.0, 32767.0) as i16;
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

#[async_trait]
impl AudioSink for WavFileSink {
    async fn play(&self, buffer: AudioBuffer) -> Result<(), AudioError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AudioError::Sink(format!("{}: {e}", self.dir.display())))?;

        let path = self.next_path();
        tokio::fs::write(&path, encode_wav(&buffer))
            .await
            .map_err(|e| AudioError::Sink(format!("{}: {e}", path.display())))?;

        tracing::info!(
            "[WavFileSink] Wrote {:.1}s of audio to {}",
            buffer.duration().as_secs_f32(),
            path.display()
        );
        if let Ok(mut last) = self.last_path.lock() {
            *last = Some(path);
        }
        Ok(())
    }
}
