//! Cache key derivation
//!
//! A cache key is a SHA-256 fingerprint of the canonicalized synthesis
//! request. Canonicalization folds omitted options to their default
//! sentinels, so a request that leaves e.g. `speed` unset and one that
//! sets it to 1.0 explicitly land on the same key.

use sha2::{Digest, Sha256};
use std::fmt;

use crate::provider::TtsOptions;
use voicecache_core::Emotion;

/// Sentinel for an unset voice; the provider substitutes its own default.
const DEFAULT_VOICE_SENTINEL: &str = "default";

/// Opaque fingerprint of a synthesis request (lowercase hex SHA-256)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// First 8 hex chars, for logs and stats views
    pub fn prefix(&self) -> &str {
        &self.0[..8]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the cache key for a synthesis request.
///
/// Pure and infallible: equal `(text, options)` tuples always produce
/// equal keys, and semantically distinct tuples collide only with
/// cryptographically negligible probability.
pub fn derive_key(text: &str, options: &TtsOptions) -> CacheKey {
    let mut hasher = Sha256::new();

    // Length-prefix the text so field boundaries stay unambiguous.
    hasher.update(text.len().to_le_bytes());
    hasher.update(text.as_bytes());
    hasher.update(canonicalize(options).as_bytes());

    CacheKey(hex_encode(&hasher.finalize()))
}

/// Stable textual form of the option set with defaults folded in.
fn canonicalize(options: &TtsOptions) -> String {
    let voice = options.voice_id.as_deref().unwrap_or(DEFAULT_VOICE_SENTINEL);
    let emotion = options.emotion.unwrap_or(Emotion::Neutral);

    format!(
        "|voice={}|emotion={}|speed={}|pitch={}|volume={}",
        voice,
        emotion.as_str(),
        canon_f32(options.speed.unwrap_or(1.0)),
        canon_f32(options.pitch.unwrap_or(0.0)),
        canon_f32(options.volume.unwrap_or(0.0)),
    )
}

/// Fixed-precision float formatting so 1.0 and 1.00 canonicalize alike.
fn canon_f32(value: f32) -> String {
    format!("{:.4}", value)
}

fn hex_encode(digest: &[u8]) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_requests_yield_equal_keys() {
        let opts = TtsOptions {
            voice_id: Some("ko-KR-Neural2-A".to_string()),
            emotion: Some(Emotion::Happy),
            speed: Some(1.1),
            ..Default::default()
        };
        assert_eq!(derive_key("안녕하세요", &opts), derive_key("안녕하세요", &opts));
    }

    #[test]
    fn omitted_and_explicit_defaults_collide() {
        let omitted = TtsOptions::default();
        let explicit = TtsOptions {
            voice_id: None,
            emotion: Some(Emotion::Neutral),
            speed: Some(1.0),
            pitch: Some(0.0),
            volume: Some(0.0),
        };
        assert_eq!(derive_key("hello", &omitted), derive_key("hello", &explicit));
    }

    #[test]
    fn distinct_tuples_yield_distinct_keys() {
        let base = TtsOptions::default();
        let happy = TtsOptions {
            emotion: Some(Emotion::Happy),
            ..Default::default()
        };
        let fast = TtsOptions {
            speed: Some(1.5),
            ..Default::default()
        };

        let k0 = derive_key("hello", &base);
        assert_ne!(k0, derive_key("world", &base));
        assert_ne!(k0, derive_key("hello", &happy));
        assert_ne!(k0, derive_key("hello", &fast));
    }

    #[test]
    fn text_boundaries_are_unambiguous() {
        // "ab" + voice "c..." must not collide with "abc" + shifted options
        let a = derive_key("ab", &TtsOptions::default());
        let b = derive_key("ab|voice=default", &TtsOptions::default());
        assert_ne!(a, b);
    }

    #[test]
    fn key_is_hex_sha256() {
        let key = derive_key("x", &TtsOptions::default());
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key.prefix().len(), 8);
    }
}
