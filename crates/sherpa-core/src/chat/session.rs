//! Chat session controller.
//!
//! Keeps the ordered, append-only message history and forwards each new
//! visitor message to the [`TextGenerator`]. Only one request may be in flight
//! at a time, so the history always reads user, assistant, user, assistant...
//! after the greeting.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::flight::Flight;

use super::generator::{ReasoningMode, TextGenerator};
use super::message::ChatMessage;
use super::preamble::system_instruction;

/// First assistant message of every session.
pub const GREETING: &str = "Namaste! I'm your AI Sherpa. Ask me anything about the Kedarkantha trek, gear, or weather! 🏔️";

/// What a call to [`ChatSession::submit_message`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank text, or a request was already in flight.
    Ignored,
    /// A user message and exactly one assistant reply were appended.
    Replied {
        /// History index of the assistant reply.
        reply_index: usize,
    },
}

struct ChatState {
    history: Vec<ChatMessage>,
    draft: String,
    mode: ReasoningMode,
    request: Flight<usize>,
}

/// One visitor's conversation with the AI Sherpa.
pub struct ChatSession {
    id: Uuid,
    generator: Arc<dyn TextGenerator>,
    state: Mutex<ChatState>,
}

impl ChatSession {
    /// Starts a session seeded with the greeting.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            id: Uuid::new_v4(),
            generator,
            state: Mutex::new(ChatState {
                history: vec![ChatMessage::assistant(GREETING)],
                draft: String::new(),
                mode: ReasoningMode::default(),
                request: Flight::Idle,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Sends a visitor message and waits for the reply.
    ///
    /// The user message is appended before the collaborator is called, and
    /// the draft buffer is cleared at the same point.
    pub async fn submit_message(&self, text: impl Into<String>) -> SendOutcome {
        let text = text.into();

        let mode = {
            let mut state = self.state.lock().await;
            if text.trim().is_empty() {
                return SendOutcome::Ignored;
            }
            if !state.request.try_begin() {
                tracing::warn!(
                    "[Chat {}] Request already in flight, dropping message",
                    self.id
                );
                return SendOutcome::Ignored;
            }
            state.history.push(ChatMessage::user(text.clone()));
            state.draft.clear();
            state.mode
        };

        tracing::debug!("[Chat {}] Requesting {:?} reply", self.id, mode);
        let instruction = system_instruction(mode);
        let reply = self
            .generator
            .complete(&text, Some(&instruction), mode)
            .await;

        let mut state = self.state.lock().await;
        state.history.push(ChatMessage::assistant(reply));
        let reply_index = state.history.len() - 1;
        state.request.resolve(reply_index);
        tracing::info!("[Chat {}] Reply appended at {}", self.id, reply_index);

        SendOutcome::Replied { reply_index }
    }

    /// Sends whatever is in the draft buffer.
    pub async fn submit_draft(&self) -> SendOutcome {
        let draft = self.state.lock().await.draft.clone();
        self.submit_message(draft).await
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.state.lock().await.draft = text.into();
    }

    pub async fn draft(&self) -> String {
        self.state.lock().await.draft.clone()
    }

    /// Snapshot of the history, in display order.
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.state.lock().await.history.clone()
    }

    pub async fn message(&self, index: usize) -> Option<ChatMessage> {
        self.state.lock().await.history.get(index).cloned()
    }

    /// True while a reply is being generated.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.request.is_pending()
    }

    pub async fn mode(&self) -> ReasoningMode {
        self.state.lock().await.mode
    }

    /// Changes the mode used by the next request.
    pub async fn set_mode(&self, mode: ReasoningMode) {
        self.state.lock().await.mode = mode;
    }

    /// Flips between fast and deep reasoning, returning the new mode.
    pub async fn toggle_deep_reasoning(&self) -> ReasoningMode {
        let mut state = self.state.lock().await;
        state.mode = match state.mode {
            ReasoningMode::Fast => ReasoningMode::Deep,
            ReasoningMode::Deep => ReasoningMode::Fast,
        };
        state.mode
    }
}
