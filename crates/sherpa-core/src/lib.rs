//! Core domain of the Sherpa trek assistant: the enquiry form, the AI Sherpa
//! chat session and the speech playback pipeline.
//!
//! Nothing in this crate performs I/O. External services are reached through
//! the collaborator traits ([`enquiry::EnquiryRepository`],
//! [`chat::TextGenerator`], [`speech::SpeechSynthesizer`],
//! [`speech::AudioSink`]), which are constructed once at startup and handed to
//! the controllers.

pub mod chat;
pub mod config;
pub mod enquiry;
pub mod error;
pub mod flight;
pub mod secret;
pub mod speech;

// Re-export common error type
pub use error::SherpaError;
pub use flight::Flight;
