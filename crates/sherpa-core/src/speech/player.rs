//! Single-flight speech playback.
//!
//! `speak` runs synthesize → decode → play for one chat message. While one
//! message is being spoken, further requests are dropped rather than queued.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::flight::Flight;

use super::pcm::{AudioBuffer, AudioError, AudioFormat};
use super::synthesizer::{AudioSink, SpeechSynthesizer};

/// How the last playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackResult {
    Played,
    /// The synthesizer returned nothing.
    NoAudio,
    /// Decoding or the sink failed.
    Failed,
}

/// What a call to [`SpeechPlayer::speak`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Another message was already being spoken.
    Ignored,
    Played,
    NoAudio,
    Failed(AudioError),
}

#[derive(Default)]
struct PlaybackState {
    active_index: Option<usize>,
    playback: Flight<PlaybackResult>,
}

/// Speaks chat messages aloud, one at a time.
pub struct SpeechPlayer {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    sink: Arc<dyn AudioSink>,
    format: AudioFormat,
    state: Mutex<PlaybackState>,
}

impl SpeechPlayer {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        sink: Arc<dyn AudioSink>,
        format: AudioFormat,
    ) -> Self {
        Self {
            synthesizer,
            sink,
            format,
            state: Mutex::new(PlaybackState::default()),
        }
    }

    /// Synthesizes `text` and plays it, marking `message_index` as speaking
    /// until playback ends or fails.
    pub async fn speak(&self, text: &str, message_index: usize) -> SpeakOutcome {
        {
            let mut state = self.state.lock().await;
            if !state.playback.try_begin() {
                tracing::warn!(
                    "Speech for message {:?} still active, dropping request for {}",
                    state.active_index,
                    message_index
                );
                return SpeakOutcome::Ignored;
            }
            state.active_index = Some(message_index);
        }

        let outcome = self.run(text, message_index).await;

        let mut state = self.state.lock().await;
        state.active_index = None;
        state.playback.resolve(match &outcome {
            SpeakOutcome::Played => PlaybackResult::Played,
            SpeakOutcome::NoAudio => PlaybackResult::NoAudio,
            SpeakOutcome::Failed(_) | SpeakOutcome::Ignored => PlaybackResult::Failed,
        });
        outcome
    }

    async fn run(&self, text: &str, message_index: usize) -> SpeakOutcome {
        let Some(payload) = self.synthesizer.synthesize(text).await else {
            tracing::warn!("No audio returned for message {}", message_index);
            return SpeakOutcome::NoAudio;
        };

        let buffer = match AudioBuffer::from_base64(&payload, self.format) {
            Ok(buffer) => buffer,
            Err(err) => {
                tracing::warn!("Failed to decode audio for message {}: {}", message_index, err);
                return SpeakOutcome::Failed(err);
            }
        };

        tracing::debug!(
            "Playing {} frame(s) at {} Hz for message {}",
            buffer.frames(),
            buffer.sample_rate(),
            message_index
        );
        match self.sink.play(buffer).await {
            Ok(()) => SpeakOutcome::Played,
            Err(err) => {
                tracing::warn!("Playback failed for message {}: {}", message_index, err);
                SpeakOutcome::Failed(err)
            }
        }
    }

    /// Index of the message currently being synthesized or played.
    pub async fn active_index(&self) -> Option<usize> {
        self.state.lock().await.active_index
    }

    /// How the last playback ended, if any has finished.
    pub async fn last_result(&self) -> Option<PlaybackResult> {
        self.state.lock().await.playback.outcome().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    fn pcm_payload(samples: &[i16]) -> String {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        BASE64_STANDARD.encode(bytes)
    }

    // Mock SpeechSynthesizer returning a fixed payload
    struct FixedSynthesizer {
        payload: Option<String>,
        calls: AtomicUsize,
        started: StdMutex<Option<oneshot::Sender<()>>>,
        release: Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl FixedSynthesizer {
        fn new(payload: Option<String>) -> Self {
            Self {
                payload,
                calls: AtomicUsize::new(0),
                started: StdMutex::new(None),
                release: Mutex::new(None),
            }
        }

        fn gated(payload: Option<String>) -> (Self, oneshot::Receiver<()>, oneshot::Sender<()>) {
            let (started_tx, started_rx) = oneshot::channel();
            let (release_tx, release_rx) = oneshot::channel();
            let synthesizer = Self {
                payload,
                calls: AtomicUsize::new(0),
                started: StdMutex::new(Some(started_tx)),
                release: Mutex::new(Some(release_rx)),
            };
            (synthesizer, started_rx, release_tx)
        }
    }

    #[async_trait::async_trait]
    impl SpeechSynthesizer for FixedSynthesizer {
        async fn synthesize(&self, _text: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(started) = self.started.lock().unwrap().take() {
                let _ = started.send(());
            }
            if let Some(release) = self.release.lock().await.take() {
                let _ = release.await;
            }
            self.payload.clone()
        }
    }

    // Mock AudioSink that keeps every buffer it was asked to play
    #[derive(Default)]
    struct RecordingSink {
        played: StdMutex<Vec<AudioBuffer>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl AudioSink for RecordingSink {
        async fn play(&self, buffer: AudioBuffer) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::Sink("device busy".to_string()));
            }
            self.played.lock().unwrap().push(buffer);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_speak_decodes_and_plays() {
        let synthesizer = Arc::new(FixedSynthesizer::new(Some(pcm_payload(&[
            0, 16384, -32768, 32767,
        ]))));
        let sink = Arc::new(RecordingSink::default());
        let player = SpeechPlayer::new(synthesizer, sink.clone(), AudioFormat::default());

        assert_eq!(player.speak("Namaste", 0).await, SpeakOutcome::Played);
        assert_eq!(player.active_index().await, None);
        assert_eq!(player.last_result().await, Some(PlaybackResult::Played));

        let played = sink.played.lock().unwrap();
        assert_eq!(played.len(), 1);
        let samples = played[0].channel(0).unwrap();
        assert_eq!(&samples[..3], &[0.0, 0.5, -1.0]);
        assert!((samples[3] - 0.99997).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_missing_audio_clears_active_index() {
        let player = SpeechPlayer::new(
            Arc::new(FixedSynthesizer::new(None)),
            Arc::new(RecordingSink::default()),
            AudioFormat::default(),
        );

        assert_eq!(player.speak("Namaste", 4).await, SpeakOutcome::NoAudio);
        assert_eq!(player.active_index().await, None);
        assert_eq!(player.last_result().await, Some(PlaybackResult::NoAudio));
    }

    #[tokio::test]
    async fn test_decode_failure_clears_active_index() {
        let player = SpeechPlayer::new(
            Arc::new(FixedSynthesizer::new(Some("@@@".to_string()))),
            Arc::new(RecordingSink::default()),
            AudioFormat::default(),
        );

        let outcome = player.speak("Namaste", 2).await;
        assert!(matches!(outcome, SpeakOutcome::Failed(AudioError::InvalidEncoding(_))));
        assert_eq!(player.active_index().await, None);
    }

    #[tokio::test]
    async fn test_sink_failure_clears_active_index() {
        let sink = Arc::new(RecordingSink {
            played: StdMutex::new(Vec::new()),
            fail: true,
        });
        let player = SpeechPlayer::new(
            Arc::new(FixedSynthesizer::new(Some(pcm_payload(&[1, 2])))),
            sink,
            AudioFormat::default(),
        );

        assert_eq!(
            player.speak("Namaste", 2).await,
            SpeakOutcome::Failed(AudioError::Sink("device busy".to_string()))
        );
        assert_eq!(player.active_index().await, None);
        assert_eq!(player.last_result().await, Some(PlaybackResult::Failed));
    }

    #[tokio::test]
    async fn test_second_speak_while_active_is_dropped() {
        let (synthesizer, started, release) =
            FixedSynthesizer::gated(Some(pcm_payload(&[0, 0])));
        let synthesizer = Arc::new(synthesizer);
        let player = SpeechPlayer::new(
            synthesizer.clone(),
            Arc::new(RecordingSink::default()),
            AudioFormat::default(),
        );

        let interrupt = async {
            started.await.unwrap();
            let outcome = player.speak("second", 5).await;
            let active = player.active_index().await;
            release.send(()).unwrap();
            (outcome, active)
        };
        let (first, (second, active_during)) = tokio::join!(player.speak("first", 1), interrupt);

        assert_eq!(first, SpeakOutcome::Played);
        assert_eq!(second, SpeakOutcome::Ignored);
        assert_eq!(active_during, Some(1));
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(player.active_index().await, None);
    }

    #[tokio::test]
    async fn test_can_speak_again_after_finishing() {
        let synthesizer = Arc::new(FixedSynthesizer::new(Some(pcm_payload(&[7]))));
        let player = SpeechPlayer::new(
            synthesizer.clone(),
            Arc::new(RecordingSink::default()),
            AudioFormat::default(),
        );

        assert_eq!(player.speak("one", 0).await, SpeakOutcome::Played);
        assert_eq!(player.speak("two", 2).await, SpeakOutcome::Played);
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 2);
    }
}
