//! Assistant configuration and credential handling.

use std::time::Duration;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "ECHO_AI_MODEL";
pub const BASE_URL_ENV: &str = "ECHO_AI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Storage key holding the serialized transcript.
pub const TRANSCRIPT_KEY: &str = "dr-echo-transcript";

/// Values shipped in sample env files that are never real keys.
const PLACEHOLDER_KEYS: &[&str] = &[
    "your_api_key_here",
    "your-api-key",
    "YOUR_API_KEY",
    "changeme",
];

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub transcript_key: String,
    /// Pause between simulated tokens when answering offline
    pub fallback_token_delay: Duration,
    pub request_timeout: Duration,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            transcript_key: TRANSCRIPT_KEY.to_string(),
            fallback_token_delay: Duration::from_millis(30),
            request_timeout: Duration::from_secs(60),
            temperature: 0.7,
            max_output_tokens: 1024,
        }
    }
}

impl AssistantConfig {
    /// Defaults overridden by `GEMINI_API_KEY`, `ECHO_AI_MODEL` and
    /// `ECHO_AI_BASE_URL`.
    pub fn from_env() -> Self {
        let mut config = Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            ..Self::default()
        };
        if let Ok(model) = std::env::var(MODEL_ENV) {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_token_delay(mut self, delay: Duration) -> Self {
        self.fallback_token_delay = delay;
        self
    }

    pub fn with_transcript_key(mut self, key: impl Into<String>) -> Self {
        self.transcript_key = key.into();
        self
    }

    /// The key if it is present, non-blank and not a known placeholder.
    pub fn credential(&self) -> Option<&str> {
        let key = self.api_key.as_deref()?.trim();
        if key.is_empty() || PLACEHOLDER_KEYS.iter().any(|p| p.eq_ignore_ascii_case(key)) {
            None
        } else {
            Some(key)
        }
    }

    pub fn has_valid_credential(&self) -> bool {
        self.credential().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_credential() {
        let config = AssistantConfig::default();
        assert!(!config.has_valid_credential());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.transcript_key, TRANSCRIPT_KEY);
    }

    #[test]
    fn test_blank_and_placeholder_keys_rejected() {
        assert!(!AssistantConfig::default().with_api_key("   ").has_valid_credential());
        assert!(!AssistantConfig::default()
            .with_api_key("your_api_key_here")
            .has_valid_credential());
        assert!(!AssistantConfig::default().with_api_key("CHANGEME").has_valid_credential());
    }

    #[test]
    fn test_real_key_trimmed() {
        let config = AssistantConfig::default().with_api_key("  AIzaExample123  ");
        assert_eq!(config.credential(), Some("AIzaExample123"));
    }
}
