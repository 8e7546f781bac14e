//! Shared domain types for the TTS cache
//!
//! Types exchanged between the serving layer and the TTS pipeline:
//! - Emotion profiles used to shape prosody
//! - Character and conversation context for preload option derivation
//!
//! This crate is deliberately free of async code and I/O.

mod domain;

pub use domain::{Character, ConversationContext, Emotion, EmotionalState};
