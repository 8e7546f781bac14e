//! Synthesis provider abstraction
//!
//! A provider turns text plus options into encoded audio, either as one
//! buffer or as an incremental byte stream. Providers never retry; retry
//! policy belongs to whichever layer calls the manager.

mod google;
mod stub;

pub use google::GoogleSpeech;
pub use stub::StubSpeech;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

use crate::TtsError;
use voicecache_core::Emotion;
use voicecache_config::TtsSettings;

/// Synthesis options attached to a request.
///
/// All fields are optional; unset fields fall back to provider defaults
/// (voice), a neutral profile (emotion), or unity/zero gain
/// (speed/pitch/volume).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TtsOptions {
    pub voice_id: Option<String>,
    pub emotion: Option<Emotion>,
    /// Speaking rate, 1.0 = normal
    pub speed: Option<f32>,
    /// Pitch shift in semitones, 0.0 = unshifted
    pub pitch: Option<f32>,
    /// Volume gain in dB, 0.0 = unchanged
    pub volume: Option<f32>,
}

/// Incremental audio byte stream from a provider
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Bytes, ProviderError>> + Send>>;

/// Errors from the synthesis backend. Always carries the cause.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("synthesis request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no audio content in provider response")]
    EmptyAudio,

    #[error("invalid audio payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("provider credentials not configured")]
    MissingCredentials,
}

/// Capability set every synthesis backend implements
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize `text` and stream the encoded audio incrementally.
    async fn generate_stream(&self, text: &str, options: &TtsOptions)
        -> Result<AudioStream, ProviderError>;

    /// Synthesize `text` into one full audio buffer.
    async fn generate_buffer(&self, text: &str, options: &TtsOptions)
        -> Result<Bytes, ProviderError>;
}

/// Construct a provider from its configuration tag.
pub fn create_provider(settings: &TtsSettings) -> Result<Arc<dyn SpeechProvider>, TtsError> {
    match settings.provider.as_str() {
        "google" => Ok(Arc::new(GoogleSpeech::new(settings.google.clone()))),
        "stub" => Ok(Arc::new(StubSpeech::default())),
        other => Err(TtsError::UnknownProvider(other.to_string())),
    }
}
