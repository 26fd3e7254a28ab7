//! Audio sink that plays buffers on the default output device.
//!
//! Device output needs the `playback` feature (cpal, and ALSA headers on
//! Linux). [`SampleCursor`] is always built since it has no device
//! dependency.

/// Feeds interleaved samples to an output callback in whatever chunk sizes
/// the device asks for.
#[derive(Debug, Clone)]
pub struct SampleCursor {
    samples: Vec<f32>,
    position: usize,
}

impl SampleCursor {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// Copies the next samples into `out` and pads the rest with silence.
    ///
    /// Returns `true` once every sample has been handed out.
    pub fn fill(&mut self, out: &mut [f32]) -> bool {
        let remaining = &self.samples[self.position..];
        let count = remaining.len().min(out.len());
        out[..count].copy_from_slice(&remaining[..count]);
        out[count..].fill(0.0);
        self.position += count;
        self.is_drained()
    }

    pub fn is_drained(&self) -> bool {
        self.position >= self.samples.len()
    }
}

#[cfg(feature = "playback")]
pub use device::DeviceAudioSink;

#[cfg(feature = "playback")]
mod device {
    use std::sync::mpsc;
    use std::time::Duration;

    use async_trait::async_trait;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{BufferSize, OutputCallbackInfo, SampleRate, StreamConfig};

    use sherpa_core::speech::{AudioBuffer, AudioError, AudioSink};

    use super::SampleCursor;

    /// Extra wait on top of the buffer duration for device start-up latency.
    const DRAIN_GRACE: Duration = Duration::from_secs(2);
    /// Time for the device to flush its last period after the cursor drains.
    const TAIL: Duration = Duration::from_millis(150);

    pub struct DeviceAudioSink {
        device_name: String,
    }

    impl DeviceAudioSink {
        /// Returns `None` when the host has no default output device.
        pub fn open() -> Option<Self> {
            let device = cpal::default_host().default_output_device()?;
            let device_name = device.name().unwrap_or_else(|_| "default".to_string());
            Some(Self { device_name })
        }

        pub fn device_name(&self) -> &str {
            &self.device_name
        }
    }

    // cpal streams are not Send on every host, so the whole stream lives on
    // one blocking thread.
    fn play_blocking(buffer: AudioBuffer) -> Result<(), AudioError> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| AudioError::Sink("no output device".to_string()))?;
        let config = StreamConfig {
            channels: buffer.channel_count(),
            sample_rate: SampleRate(buffer.sample_rate()),
            buffer_size: BufferSize::Default,
        };
        let deadline = buffer.duration() + DRAIN_GRACE;

        let mut cursor = SampleCursor::new(buffer.interleaved());
        let (drained_tx, drained_rx) = mpsc::channel();
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &OutputCallbackInfo| {
                    if cursor.fill(data) {
                        let _ = drained_tx.send(());
                    }
                },
                |err| tracing::error!("[DeviceAudioSink] Stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::Sink(format!("could not open output stream: {e}")))?;

        stream
            .play()
            .map_err(|e| AudioError::Sink(format!("could not start playback: {e}")))?;
        drained_rx
            .recv_timeout(deadline)
            .map_err(|_| AudioError::Sink("playback did not finish in time".to_string()))?;
        std::thread::sleep(TAIL);
        Ok(())
    }

    #[async_trait]
    impl AudioSink for DeviceAudioSink {
        /// Resolves once the buffer has finished playing.
        async fn play(&self, buffer: AudioBuffer) -> Result<(), AudioError> {
            if buffer.is_empty() {
                return Ok(());
            }
            let seconds = buffer.duration().as_secs_f32();

            tokio::task::spawn_blocking(move || play_blocking(buffer))
                .await
                .map_err(|e| AudioError::Sink(format!("playback task failed: {e}")))??;

            tracing::info!(
                "[DeviceAudioSink] Played {:.1}s of audio on {}",
                seconds,
                self.device_name
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_hands_out_samples_in_device_sized_chunks() {
        let mut cursor = SampleCursor::new(vec![0.1, 0.2, 0.3, 0.4, 0.5]);
        let mut period = [9.0f32; 2];

        assert!(!cursor.fill(&mut period));
        assert_eq!(period, [0.1, 0.2]);
        assert!(!cursor.fill(&mut period));
        assert_eq!(period, [0.3, 0.4]);
        assert!(cursor.fill(&mut period));
        assert_eq!(period, [0.5, 0.0]);
    }

    #[test]
    fn test_drained_cursor_plays_silence() {
        let mut cursor = SampleCursor::new(vec![0.25]);
        let mut period = [1.0f32; 4];
        assert!(cursor.fill(&mut period));

        let mut next = [1.0f32; 3];
        assert!(cursor.fill(&mut next));
        assert_eq!(next, [0.0; 3]);
        assert!(cursor.is_drained());
    }

    #[test]
    fn test_empty_cursor_is_drained() {
        let mut cursor = SampleCursor::new(Vec::new());
        assert!(cursor.is_drained());
        let mut period = [0.5f32; 2];
        assert!(cursor.fill(&mut period));
        assert_eq!(period, [0.0, 0.0]);
    }
}
