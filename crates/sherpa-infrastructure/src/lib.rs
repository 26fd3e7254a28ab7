//! Local environment and persistence for Sherpa.
//!
//! - [`paths`]: platform config/data directories
//! - [`storage`]: secret.json and config.toml loading
//! - [`SecretServiceImpl`]: secrets with environment overrides
//! - [`SupabaseEnquiryRepository`]: enquiry persistence over PostgREST
//! - [`WavFileSink`]: audio sink writing WAV files
//! - [`device_sink`]: audio sink playing on the default output device
//!   (`playback` feature)

pub mod device_sink;
pub mod paths;
pub mod secret_service;
pub mod storage;
pub mod supabase_enquiry_repository;
pub mod wav_sink;

pub use paths::{PathError, SherpaPaths};
pub use secret_service::{EnvOverrides, SecretServiceImpl};
pub use storage::{ConfigStorage, ConfigStorageError, SecretStorage, SecretStorageError};
pub use supabase_enquiry_repository::SupabaseEnquiryRepository;
pub use wav_sink::WavFileSink;

#[cfg(feature = "playback")]
pub use device_sink::DeviceAudioSink;
