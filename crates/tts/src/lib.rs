//! TTS response cache and streaming pipeline
//!
//! This crate is the speech side of the chat stack:
//! - Deterministic fingerprinting of synthesis requests
//! - In-memory audio cache with TTL and least-used eviction
//! - Provider abstraction with a Google Cloud TTS adapter
//! - A manager that streams misses live while capturing them for
//!   future hits, and warms the cache with likely-next utterances
//!
//! The cache is process-local by design; it starts empty on boot and is
//! cleared only on operator command.

pub mod cache;
pub mod key;
pub mod manager;
pub mod provider;

// Cache exports
pub use cache::{AudioCache, CacheStats, EntrySummary};

// Key exports
pub use key::{derive_key, CacheKey};

// Provider exports
pub use provider::{
    create_provider, AudioStream, GoogleSpeech, ProviderError, SpeechProvider, StubSpeech,
    TtsOptions,
};

// Manager exports
pub use manager::TtsManager;

use thiserror::Error;

/// TTS pipeline errors
#[derive(Error, Debug)]
pub enum TtsError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("unknown TTS provider: {0}")]
    UnknownProvider(String),
}
