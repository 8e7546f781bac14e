//! Google Cloud Text-to-Speech adapter
//!
//! Talks to the REST `text:synthesize` endpoint. Emotion is expressed as
//! an SSML prosody profile; Korean text gets say-as normalization so
//! ages, years and heart symbols are read naturally. The API returns the
//! whole utterance at once, so streaming chunks the synthesized buffer.

use async_stream::stream;
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{AudioStream, ProviderError, SpeechProvider, TtsOptions};
use voicecache_config::GoogleSettings;
use voicecache_core::Emotion;

/// Chunk size for simulated streaming of the synthesized buffer
const STREAM_CHUNK_SIZE: usize = 4096;

static AGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)살").expect("valid regex"));
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})년").expect("valid regex"));
static HEART_RE: Lazy<Regex> = Lazy::new(|| Regex::new("[♥❤]").expect("valid regex"));

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest {
    input: SynthesisInput,
    voice: VoiceSelection,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput {
    ssml: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection {
    language_code: String,
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
    pitch: f32,
    volume_gain_db: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

/// Google Cloud TTS provider
pub struct GoogleSpeech {
    client: reqwest::Client,
    settings: GoogleSettings,
}

impl GoogleSpeech {
    pub fn new(settings: GoogleSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    /// One synthesize round-trip; both trait methods go through here.
    async fn synthesize(&self, text: &str, options: &TtsOptions) -> Result<Bytes, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials)?;

        let request = self.build_request(text, options);
        let url = format!("{}/v1/text:synthesize", self.settings.endpoint);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SynthesizeResponse = response.json().await?;
        let encoded = parsed.audio_content.ok_or(ProviderError::EmptyAudio)?;
        if encoded.is_empty() {
            return Err(ProviderError::EmptyAudio);
        }

        let audio = base64::engine::general_purpose::STANDARD.decode(encoded)?;
        tracing::debug!(bytes = audio.len(), "google tts synthesis complete");
        Ok(Bytes::from(audio))
    }

    fn build_request(&self, text: &str, options: &TtsOptions) -> SynthesizeRequest {
        SynthesizeRequest {
            input: SynthesisInput {
                ssml: self.build_ssml(text, options),
            },
            voice: VoiceSelection {
                language_code: self.settings.language_code.clone(),
                name: options
                    .voice_id
                    .clone()
                    .unwrap_or_else(|| self.settings.default_voice.clone()),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: options.speed.unwrap_or(1.0),
                pitch: options.pitch.unwrap_or(0.0),
                volume_gain_db: options.volume.unwrap_or(0.0),
            },
        }
    }

    /// Wrap the text in SSML: prosody profile for the emotion, then
    /// Korean-specific read-out hints.
    fn build_ssml(&self, text: &str, options: &TtsOptions) -> String {
        let emotion = options.emotion.unwrap_or(Emotion::Neutral);
        let escaped = escape_ssml(text);

        let body = match prosody_profile(emotion) {
            Some((rate, pitch)) => format!(
                "<prosody rate=\"{}\" pitch=\"{}\">{}</prosody>",
                rate, pitch, escaped
            ),
            None => escaped,
        };

        format!("<speak>{}</speak>", normalize_korean(&body))
    }
}

/// Prosody (rate, pitch) per emotion; neutral speaks unmodified.
fn prosody_profile(emotion: Emotion) -> Option<(&'static str, &'static str)> {
    match emotion {
        Emotion::Happy => Some(("110%", "+2st")),
        Emotion::Sad => Some(("90%", "-2st")),
        Emotion::Excited => Some(("120%", "+3st")),
        Emotion::Calm => Some(("85%", "-1st")),
        Emotion::Romantic => Some(("95%", "+1st")),
        Emotion::Shy => Some(("90%", "+1st")),
        Emotion::Angry => Some(("105%", "-1st")),
        Emotion::Neutral => None,
    }
}

/// Korean read-out hints: ages as cardinals, four-digit years as dates,
/// heart symbols spoken as "하트".
fn normalize_korean(ssml: &str) -> String {
    let ssml = AGE_RE.replace_all(ssml, "<say-as interpret-as=\"cardinal\">$1</say-as>살");
    let ssml = YEAR_RE.replace_all(&ssml, "<say-as interpret-as=\"date\" format=\"y\">$1</say-as>");
    HEART_RE
        .replace_all(&ssml, "<sub alias=\"하트\">♥</sub>")
        .into_owned()
}

fn escape_ssml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[async_trait]
impl SpeechProvider for GoogleSpeech {
    async fn generate_stream(
        &self,
        text: &str,
        options: &TtsOptions,
    ) -> Result<AudioStream, ProviderError> {
        let audio = self.synthesize(text, options).await?;

        Ok(Box::pin(stream! {
            let mut offset = 0;
            while offset < audio.len() {
                let end = (offset + STREAM_CHUNK_SIZE).min(audio.len());
                yield Ok(audio.slice(offset..end));
                offset = end;
            }
        }))
    }

    async fn generate_buffer(
        &self,
        text: &str,
        options: &TtsOptions,
    ) -> Result<Bytes, ProviderError> {
        self.synthesize(text, options).await
    }
}
