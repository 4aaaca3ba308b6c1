use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::data::DataConfig;
use self::speech::SpeechConfig;
use self::ui::UiConfig;

pub mod cache;
pub mod data;
pub mod speech;
pub mod ui;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub speech: SpeechConfig,
    pub cache: CacheConfig,
    pub data: DataConfig,
}

impl Config {
    /// Defaults overridden by environment variables
    pub fn new() -> Self {
        let mut config = Config::default();

        if let Some(page_size) = env_parse::<usize>("PHRASEBOOK_PAGE_SIZE")
            && page_size > 0
        {
            config.ui.page_size = page_size;
        }

        if let Some(debounce_ms) = env_parse("PHRASEBOOK_DEBOUNCE_MS") {
            config.ui.debounce_ms = debounce_ms;
        }

        if let Ok(program) = env::var("PHRASEBOOK_TTS_PROGRAM") {
            config.speech.program = program;
        }

        if let Ok(voice) = env::var("PHRASEBOOK_TTS_VOICE") {
            config.speech.voice = voice;
        }

        if let Ok(root) = env::var("PHRASEBOOK_CACHE_DIR") {
            config.cache.root = PathBuf::from(root);
        }

        if let Ok(scope) = env::var("PHRASEBOOK_CACHE_SCOPE") {
            config.cache.scope = Some(scope);
        }

        if let Ok(path) = env::var("PHRASEBOOK_DATA") {
            config.data.path = Some(PathBuf::from(path));
        }

        if let Ok(url) = env::var("PHRASEBOOK_DATA_URL") {
            config.data.url = Some(url);
        }

        // NO_COLOR convention
        if env::var_os("NO_COLOR").is_some() {
            config.ui.color = false;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_phrasebook() {
        let config = Config::default();
        assert_eq!(config.ui.page_size, 20);
        assert_eq!(config.ui.debounce_ms, 300);
        assert_eq!(config.speech.language, "it-IT");
        assert_eq!(config.speech.word_gap_ms, 200);
        assert_eq!(config.cache.cache_name(), "bengali-italian-phrasebook-v7");
        assert!(config.data.path.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let json = r#"{ "ui": { "page_size": 10 }, "cache": { "version": "v8" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.ui.page_size, 10);
        assert_eq!(config.ui.debounce_ms, 300);
        assert_eq!(config.cache.cache_name(), "bengali-italian-phrasebook-v8");
        assert!((config.speech.slow_rate - 0.7).abs() < f32::EPSILON);
    }
}
