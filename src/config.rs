//! User settings, loaded from `settings.toml`.
//!
//! Every key is optional. A missing file is not an error and yields the
//! defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::deck::PAIR_COUNT;
use crate::error::ConfigError;

pub const SETTINGS_FILE_NAME: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Endpoint that draws a fresh deck.
    #[serde(default = "default_deck_url")]
    pub deck_url: String,
    /// Seconds on the countdown when a game starts.
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u32,
    /// Length of the card flip; a pair is judged once the second flip ends.
    #[serde(default = "default_flip_duration_ms")]
    pub flip_duration_ms: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_deck_url() -> String {
    format!("https://deckofcardsapi.com/api/deck/new/draw/?count={PAIR_COUNT}")
}

fn default_time_limit_secs() -> u32 {
    60
}

fn default_flip_duration_ms() -> u32 {
    260
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            deck_url: default_deck_url(),
            time_limit_secs: default_time_limit_secs(),
            flip_duration_ms: default_flip_duration_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(
            settings.deck_url,
            "https://deckofcardsapi.com/api/deck/new/draw/?count=8"
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml("time_limit_secs = 45\nlog_filter = \"debug\"").unwrap();
        assert_eq!(settings.time_limit_secs, 45);
        assert_eq!(settings.log_filter, "debug");
        assert_eq!(settings.flip_duration_ms, 260);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(matches!(
            Settings::from_toml("time_limit_secs = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let settings = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.request_timeout(), Duration::from_secs(1));
    }
}
