//! Configuration management for the TTS cache
//!
//! Layered settings loading:
//! 1. Environment variables (VOICECACHE_ prefix, `__` separator)
//! 2. config/{env}.toml (if an environment name is given)
//! 3. config/default.toml

mod settings;
mod tts;

pub use settings::{load_settings, Settings};
pub use tts::{GoogleSettings, TtsSettings};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
