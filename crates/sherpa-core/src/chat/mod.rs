//! Chat domain module.
//!
//! # Module Structure
//!
//! - `message`: Roles and history entries
//! - `generator`: Text-generation collaborator trait and fallbacks
//! - `preamble`: Fixed system instruction for the AI Sherpa
//! - `session`: Chat session controller
//! - `mystery`: Mystery Day riddles

mod generator;
mod message;
mod mystery;
mod preamble;
mod session;

pub use generator::{EMPTY_REPLY_FALLBACK, ReasoningMode, TextGenerator, UNAVAILABLE_FALLBACK};
pub use message::{ChatMessage, MessageRole};
pub use mystery::{CLUE_PROMPT, MysteryOracle, STORYTELLER_INSTRUCTION};
pub use preamble::{DEEP_REASONING_EMPHASIS, SHERPA_PREAMBLE, system_instruction};
pub use session::{ChatSession, GREETING, SendOutcome};
