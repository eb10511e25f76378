//! Session configuration from environment.

use std::env;
use std::time::Duration;

use aiatc_core::Language;

const MIN_PROXIMITY_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub proximity_interval_ms: u64,
    /// Farthest distance at which the tuned airport answers.
    pub max_range_nm: f64,
    pub language: Language,
    pub chat_url: String,
    pub chat_api_key: Option<String>,
    pub chat_model: String,
    pub chat_timeout_secs: u64,
    pub speech_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proximity_interval_ms: 500,
            max_range_nm: 50.0,
            language: Language::En,
            chat_url: "http://localhost:11434/v1/chat/completions".to_string(),
            chat_api_key: None,
            chat_model: "gpt-4o-mini".to_string(),
            chat_timeout_secs: 60,
            speech_timeout_secs: 15,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            proximity_interval_ms: env::var("ATC_PROXIMITY_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms: &u64| *ms > 0)
                .unwrap_or(defaults.proximity_interval_ms),
            max_range_nm: env::var("ATC_MAX_RANGE_NM")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|nm: &f64| nm.is_finite() && *nm > 0.0)
                .unwrap_or(defaults.max_range_nm),
            language: env::var("ATC_LANGUAGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.language),
            chat_url: env::var("ATC_CHAT_URL").unwrap_or(defaults.chat_url),
            chat_api_key: env::var("ATC_CHAT_API_KEY")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            chat_model: env::var("ATC_CHAT_MODEL").unwrap_or(defaults.chat_model),
            chat_timeout_secs: env::var("ATC_CHAT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(defaults.chat_timeout_secs),
            speech_timeout_secs: env::var("ATC_SPEECH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(defaults.speech_timeout_secs),
        }
    }

    /// Polling period, never zero.
    pub fn proximity_interval(&self) -> Duration {
        Duration::from_millis(self.proximity_interval_ms.max(MIN_PROXIMITY_INTERVAL_MS))
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs.max(1))
    }

    pub fn speech_timeout(&self) -> Duration {
        Duration::from_secs(self.speech_timeout_secs.max(1))
    }
}
