//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, TtsSettings};

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// TTS cache and provider configuration
    #[serde(default)]
    pub tts: TtsSettings,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tts.provider.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tts.provider".to_string(),
                message: "provider tag must not be empty".to_string(),
            });
        }

        if self.tts.cache_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tts.cache_size".to_string(),
                message: "cache must hold at least one entry".to_string(),
            });
        }

        if self.tts.ttl_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tts.ttl_ms".to_string(),
                message: "ttl must be non-zero".to_string(),
            });
        }

        if self.tts.provider == "google" && self.tts.google.api_key.is_none() {
            tracing::warn!("tts.google.api_key not set; provider calls will be rejected upstream");
        }

        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (VOICECACHE_ prefix)
/// 2. config/{env}.toml (if env specified)
/// 3. config/default.toml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("VOICECACHE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.tts.provider, "google");
        assert_eq!(settings.tts.cache_size, 50);
        assert_eq!(settings.tts.ttl_ms, 3_600_000);
        assert_eq!(settings.tts.google.default_voice, "ko-KR-Neural2-A");
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.tts.cache_size = 0;
        assert!(settings.validate().is_err());

        settings.tts.cache_size = 50;
        assert!(settings.validate().is_ok());

        settings.tts.provider.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voicecache.toml");
        std::fs::write(
            &path,
            r#"
[tts]
provider = "stub"
cache_size = 8

[tts.google]
language_code = "en-US"
"#,
        )
        .unwrap();

        let config = Config::builder()
            .add_source(File::from(path))
            .build()
            .unwrap();
        let settings: Settings = config.try_deserialize().unwrap();

        assert_eq!(settings.tts.provider, "stub");
        assert_eq!(settings.tts.cache_size, 8);
        assert_eq!(settings.tts.google.language_code, "en-US");
        // Untouched fields keep their defaults
        assert_eq!(settings.tts.ttl_ms, 3_600_000);
    }
}
