//! Conversation domain types

use serde::{Deserialize, Serialize};

/// Emotional profile for a synthesized utterance.
///
/// Each variant maps to a provider-specific prosody profile
/// (speaking rate and pitch shift).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Excited,
    Calm,
    Romantic,
    Shy,
    #[default]
    Neutral,
}

impl Emotion {
    /// Stable lowercase name, used in cache key canonicalization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Excited => "excited",
            Emotion::Calm => "calm",
            Emotion::Romantic => "romantic",
            Emotion::Shy => "shy",
            Emotion::Neutral => "neutral",
        }
    }
}

/// A catalog character with an assigned synthesis voice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    /// Provider voice identifier (e.g. "ko-KR-Neural2-A")
    pub voice_id: String,
}

/// Current emotional state of a conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionalState {
    pub current: Emotion,
    /// Intensity in 0-100
    #[serde(default)]
    pub intensity: u8,
}

/// Conversation context handed to the preloader.
///
/// Carries just enough to derive synthesis options for likely-next
/// utterances: which voice speaks and in what emotional state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub character: Character,
    pub emotional_state: EmotionalState,
    /// Relationship progression, 0-100
    #[serde(default)]
    pub relationship_level: u8,
}
