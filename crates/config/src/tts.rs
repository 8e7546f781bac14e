//! TTS pipeline configuration

use serde::{Deserialize, Serialize};

/// TTS cache and provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsSettings {
    /// Which synthesis provider to construct ("google" or "stub")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Maximum number of cached audio entries
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    /// Cache entry time-to-live in milliseconds
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,

    /// Retry budget, passed through to the serving layer.
    /// The cache core itself never retries.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries in milliseconds, passed through like
    /// `max_retries`.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Google Cloud TTS adapter configuration
    #[serde(default)]
    pub google: GoogleSettings,
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_cache_size() -> usize {
    50
}

fn default_ttl_ms() -> u64 {
    3_600_000 // 1 hour
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            cache_size: default_cache_size(),
            ttl_ms: default_ttl_ms(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            google: GoogleSettings::default(),
        }
    }
}

/// Google Cloud Text-to-Speech REST adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSettings {
    /// REST endpoint base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key (set via VOICECACHE__TTS__GOOGLE__API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    /// BCP-47 language code
    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Voice used when a request does not name one
    #[serde(default = "default_voice")]
    pub default_voice: String,
}

fn default_endpoint() -> String {
    "https://texttospeech.googleapis.com".to_string()
}

fn default_language_code() -> String {
    "ko-KR".to_string()
}

fn default_voice() -> String {
    "ko-KR-Neural2-A".to_string()
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            language_code: default_language_code(),
            default_voice: default_voice(),
        }
    }
}
