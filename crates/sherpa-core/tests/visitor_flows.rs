//! End-to-end visitor flows through the public API: fill the enquiry form,
//! chat with the Sherpa, then listen to a reply.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use sherpa_core::SherpaError;
use sherpa_core::chat::{ChatSession, MessageRole, ReasoningMode, SendOutcome, TextGenerator};
use sherpa_core::enquiry::{
    EnquiryController, EnquiryRecord, EnquiryRepository, Field, SubmissionStatus, SubmitOutcome,
};
use sherpa_core::speech::{
    AudioBuffer, AudioError, AudioFormat, AudioSink, SpeakOutcome, SpeechPlayer,
    SpeechSynthesizer,
};

struct InMemoryRepository {
    records: Mutex<Vec<EnquiryRecord>>,
    fail_next: AtomicUsize,
}

#[async_trait::async_trait]
impl EnquiryRepository for InMemoryRepository {
    async fn save(&self, record: &EnquiryRecord) -> sherpa_core::error::Result<()> {
        if self.fail_next.load(Ordering::SeqCst) > 0 {
            self.fail_next.fetch_sub(1, Ordering::SeqCst);
            return Err(SherpaError::persistence("503 Service Unavailable"));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

struct CannedGenerator;

#[async_trait::async_trait]
impl TextGenerator for CannedGenerator {
    async fn complete(&self, prompt: &str, _: Option<&str>, mode: ReasoningMode) -> String {
        match mode {
            ReasoningMode::Fast => format!("Quick answer to '{prompt}'"),
            ReasoningMode::Deep => format!("Considered answer to '{prompt}'"),
        }
    }
}

struct ToneSynthesizer;

#[async_trait::async_trait]
impl SpeechSynthesizer for ToneSynthesizer {
    async fn synthesize(&self, text: &str) -> Option<String> {
        let samples: Vec<u8> = (0..text.len() as i16)
            .flat_map(|i| (i * 100).to_le_bytes())
            .collect();
        Some(BASE64_STANDARD.encode(samples))
    }
}

#[derive(Default)]
struct FrameCounter {
    frames: AtomicUsize,
}

#[async_trait::async_trait]
impl AudioSink for FrameCounter {
    async fn play(&self, buffer: AudioBuffer) -> Result<(), AudioError> {
        self.frames.fetch_add(buffer.frames(), Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_enquiry_retry_after_outage() {
    let repo = Arc::new(InMemoryRepository {
        records: Mutex::new(Vec::new()),
        fail_next: AtomicUsize::new(1),
    });
    let controller = EnquiryController::new(repo.clone());

    controller.set_field(Field::Name, "Vikram Negi").await;
    controller.blur(Field::Name).await;
    controller.set_field(Field::Phone, "7012345678").await;
    controller.blur(Field::Phone).await;
    controller.set_field(Field::Travelers, "12").await;
    assert!(controller.errors().await.is_empty());

    assert_eq!(controller.submit().await, SubmitOutcome::Failed);
    assert_eq!(controller.status().await, SubmissionStatus::Error);
    assert_eq!(controller.form().await.name, "Vikram Negi");

    assert_eq!(controller.submit().await, SubmitOutcome::Saved);
    assert_eq!(controller.status().await, SubmissionStatus::Success);
    assert!(controller.form().await.is_empty());

    let records = repo.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].travelers, Some(12));
    assert_eq!(records[0].message, "");
}

#[tokio::test]
async fn test_chat_then_speak_reply() {
    let session = ChatSession::new(Arc::new(CannedGenerator));

    session.set_mode(ReasoningMode::Deep).await;
    let SendOutcome::Replied { reply_index } = session.submit_message("Is Day 4 tough?").await
    else {
        panic!("message should have been sent");
    };

    let reply = session.message(reply_index).await.unwrap();
    assert_eq!(reply.role, MessageRole::Assistant);
    assert_eq!(reply.text, "Considered answer to 'Is Day 4 tough?'");

    let sink = Arc::new(FrameCounter::default());
    let player = SpeechPlayer::new(Arc::new(ToneSynthesizer), sink.clone(), AudioFormat::default());
    assert_eq!(player.speak(&reply.text, reply_index).await, SpeakOutcome::Played);
    assert_eq!(sink.frames.load(Ordering::SeqCst), reply.text.len());
    assert_eq!(player.active_index().await, None);
}
