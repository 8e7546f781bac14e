//! TTS manager
//!
//! Façade over the cache and the synthesis provider. Every request is
//! fingerprinted and checked against the cache; misses go to the
//! provider, and on the streaming path the provider's output is teed so
//! the caller hears audio immediately while a background task captures
//! the full byte sequence for future hits.
//!
//! Cache-population failures never reach the caller: a stream that dies
//! mid-capture is logged and simply leaves the cache unpopulated.

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::cache::{AudioCache, CacheStats};
use crate::key::{derive_key, CacheKey};
use crate::provider::{create_provider, AudioStream, ProviderError, SpeechProvider, TtsOptions};
use crate::TtsError;
use voicecache_config::TtsSettings;
use voicecache_core::ConversationContext;

/// Chunk copies handed to the background capture task
enum CaptureEvent {
    Chunk(Bytes),
    /// Upstream finished cleanly; the accumulated buffer may be committed
    End,
}

/// Orchestrates cache lookups, provider calls and stream capture
pub struct TtsManager {
    provider: Arc<dyn SpeechProvider>,
    cache: Arc<AudioCache>,
    ttl: Duration,
}

impl TtsManager {
    /// Build a manager with the provider named in the settings.
    pub fn new(settings: &TtsSettings) -> Result<Self, TtsError> {
        let provider = create_provider(settings)?;
        Ok(Self::with_provider(provider, settings))
    }

    /// Build a manager around an existing provider instance.
    pub fn with_provider(provider: Arc<dyn SpeechProvider>, settings: &TtsSettings) -> Self {
        Self {
            provider,
            cache: Arc::new(AudioCache::new(settings.cache_size)),
            ttl: Duration::from_millis(settings.ttl_ms),
        }
    }

    /// Stream synthesized audio for `text`.
    ///
    /// A cache hit yields the stored buffer as a single chunk. A miss
    /// streams straight from the provider while a background task
    /// captures the bytes; the entry appears in the cache once the
    /// stream ends cleanly. A provider that cannot even start errors
    /// here; a provider that dies mid-stream surfaces the error as the
    /// next stream item.
    pub async fn stream_speech(
        &self,
        text: &str,
        options: &TtsOptions,
    ) -> Result<AudioStream, TtsError> {
        let key = derive_key(text, options);

        if let Some(data) = self.cache.get(&key) {
            tracing::debug!(key = key.prefix(), "tts stream served from cache");
            return Ok(Box::pin(tokio_stream::once(Ok::<_, ProviderError>(data))));
        }

        tracing::debug!(key = key.prefix(), "tts cache miss, streaming from provider");
        let upstream = self.provider.generate_stream(text, options).await?;
        Ok(self.tee_into_cache(key, upstream))
    }

    /// Synthesize `text` into one buffer, reading through the cache.
    pub async fn generate_speech(
        &self,
        text: &str,
        options: &TtsOptions,
    ) -> Result<Bytes, TtsError> {
        let key = derive_key(text, options);

        if let Some(data) = self.cache.get(&key) {
            tracing::debug!(key = key.prefix(), "tts buffer served from cache");
            return Ok(data);
        }

        let data = self.provider.generate_buffer(text, options).await?;
        self.cache.put(key, data.clone(), self.ttl);
        Ok(data)
    }

    /// Warm the cache with likely-next utterances.
    ///
    /// Voice and emotion come from the conversation context. Candidates
    /// run concurrently; individual failures are logged and dropped,
    /// never propagated. Best effort only.
    pub async fn preload(&self, context: &ConversationContext, candidates: &[String]) {
        let options = TtsOptions {
            voice_id: Some(context.character.voice_id.clone()),
            emotion: Some(context.emotional_state.current),
            ..Default::default()
        };

        let tasks = candidates.iter().map(|text| {
            let options = options.clone();
            async move {
                if let Err(error) = self.generate_speech(text, &options).await {
                    tracing::debug!(%error, "preload candidate failed, skipping");
                }
            }
        });

        futures::future::join_all(tasks).await;
    }

    /// Fork `upstream`: forward every chunk to the returned stream
    /// untouched and in order, feed a copy of each to a capture task
    /// that commits to the cache on clean completion.
    fn tee_into_cache(&self, key: CacheKey, mut upstream: AudioStream) -> AudioStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let (capture_tx, capture_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut clean = true;
            while let Some(item) = upstream.next().await {
                match item {
                    Ok(chunk) => {
                        let _ = capture_tx.send(CaptureEvent::Chunk(chunk.clone()));
                        // A dropped caller must not cancel the capture;
                        // keep draining the provider either way.
                        let _ = tx.send(Ok(chunk));
                    }
                    Err(error) => {
                        clean = false;
                        let _ = tx.send(Err(error));
                        break;
                    }
                }
            }
            if clean {
                let _ = capture_tx.send(CaptureEvent::End);
            }
            // Dropping capture_tx without End aborts the capture.
        });

        let cache = Arc::clone(&self.cache);
        let ttl = self.ttl;
        tokio::spawn(capture_into(cache, key, ttl, capture_rx));

        Box::pin(UnboundedReceiverStream::new(rx))
    }

    /// Cache diagnostics snapshot
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Operator command: drop every cached entry.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Direct access to the store, mainly for tests and diagnostics
    pub fn cache(&self) -> &AudioCache {
        &self.cache
    }
}

/// Drain chunk copies and commit the concatenated buffer, but only if
/// the upstream ended cleanly. A torn-down channel means the stream
/// failed or was abandoned; nothing is cached then.
async fn capture_into(
    cache: Arc<AudioCache>,
    key: CacheKey,
    ttl: Duration,
    mut rx: mpsc::UnboundedReceiver<CaptureEvent>,
) {
    let mut buf = BytesMut::new();

    while let Some(event) = rx.recv().await {
        match event {
            CaptureEvent::Chunk(chunk) => buf.extend_from_slice(&chunk),
            CaptureEvent::End => {
                let data = buf.freeze();
                tracing::debug!(key = key.prefix(), bytes = data.len(), "captured tts stream");
                cache.put(key, data, ttl);
                return;
            }
        }
    }

    tracing::warn!(key = key.prefix(), "tts stream ended early, cache not populated");
}
