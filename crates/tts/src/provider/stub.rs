//! Stub synthesis provider
//!
//! Offline, deterministic provider for tests and local development.
//! Produces pseudo-audio derived from the request text so fidelity can
//! be asserted end to end without a real backend.

use async_stream::stream;
use async_trait::async_trait;
use bytes::Bytes;

use super::{AudioStream, ProviderError, SpeechProvider, TtsOptions};

/// Deterministic offline provider
pub struct StubSpeech {
    chunk_size: usize,
    /// Synthesized bytes per character of input text
    bytes_per_char: usize,
}

impl Default for StubSpeech {
    fn default() -> Self {
        tracing::warn!("using stub speech provider - audio output is synthetic");
        Self {
            chunk_size: 4096,
            bytes_per_char: 256,
        }
    }
}

impl StubSpeech {
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            bytes_per_char: 256,
        }
    }

    /// Pseudo-audio: a byte ramp seeded from the text, sized to it.
    fn render(&self, text: &str) -> Bytes {
        let seed: u8 = text.bytes().fold(0u8, |acc, b| acc.wrapping_add(b));
        let len = text.chars().count().max(1) * self.bytes_per_char;
        let data: Vec<u8> = (0..len).map(|i| seed.wrapping_add(i as u8)).collect();
        Bytes::from(data)
    }
}

#[async_trait]
impl SpeechProvider for StubSpeech {
    async fn generate_stream(
        &self,
        text: &str,
        _options: &TtsOptions,
    ) -> Result<AudioStream, ProviderError> {
        let audio = self.render(text);
        let chunk_size = self.chunk_size;

        Ok(Box::pin(stream! {
            let mut offset = 0;
            while offset < audio.len() {
                let end = (offset + chunk_size).min(audio.len());
                yield Ok(audio.slice(offset..end));
                offset = end;
            }
        }))
    }

    async fn generate_buffer(
        &self,
        text: &str,
        _options: &TtsOptions,
    ) -> Result<Bytes, ProviderError> {
        Ok(self.render(text))
    }
}
