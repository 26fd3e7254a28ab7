//! Mystery Day riddles.
//!
//! Day 6 of the itinerary is kept secret. Visitors can ask for a hint, which
//! comes back as a short cryptic riddle that never names the surprise.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::flight::Flight;

use super::generator::{ReasoningMode, TextGenerator};

pub const CLUE_PROMPT: &str = "Give me a hint about the mystery day.";

pub const STORYTELLER_INSTRUCTION: &str = "You are a mystical storyteller. Generate a short, cryptic, rhyming riddle (2 lines max) about a secret surprise activity in the Himalayas (like a hidden waterfall, a hot spring, or a ghost village). Do not reveal exactly what it is.";

#[derive(Default)]
struct ClueState {
    flight: Flight<()>,
    latest: Option<String>,
}

/// Hands out Mystery Day clues, one request at a time.
///
/// The latest clue stays readable while the next one is being generated.
pub struct MysteryOracle {
    generator: Arc<dyn TextGenerator>,
    state: Mutex<ClueState>,
}

impl MysteryOracle {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            state: Mutex::new(ClueState::default()),
        }
    }

    /// Asks for a fresh clue.
    ///
    /// Returns `None` without calling the generator if a clue is already
    /// being generated.
    pub async fn reveal_clue(&self) -> Option<String> {
        if !self.state.lock().await.flight.try_begin() {
            tracing::warn!("[Mystery] Clue already being generated, ignoring request");
            return None;
        }

        let clue = self
            .generator
            .complete(
                CLUE_PROMPT,
                Some(STORYTELLER_INSTRUCTION),
                ReasoningMode::Fast,
            )
            .await;

        let mut state = self.state.lock().await;
        state.flight.resolve(());
        state.latest = Some(clue.clone());
        Some(clue)
    }

    /// Most recently revealed clue, if any.
    pub async fn clue(&self) -> Option<String> {
        self.state.lock().await.latest.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.flight.is_pending()
    }
}
