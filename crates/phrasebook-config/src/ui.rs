use serde::{Deserialize, Serialize};

fn default_page_size() -> usize {
    20
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_title() -> String {
    "Bengali-Italian Phrasebook".to_string()
}

fn default_subtitle() -> String {
    "Your personal guide to learning Italian.".to_string()
}

fn default_color() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Phrase cards per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Quiescence window for the search input
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    /// ANSI colors, only honored when stdout is a terminal
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            title: default_title(),
            subtitle: default_subtitle(),
            color: default_color(),
        }
    }
}
