use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "it-IT".to_string()
}

fn default_voice() -> String {
    "it".to_string()
}

fn default_rate() -> f32 {
    0.9
}

fn default_slow_rate() -> f32 {
    0.7
}

fn default_word_gap_ms() -> u64 {
    200
}

fn default_program() -> String {
    "espeak-ng".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SpeechConfig {
    /// BCP 47 tag of the target language
    #[serde(default = "default_language")]
    pub language: String,
    /// Voice name passed to the synthesizer. Empty picks one from `language`.
    #[serde(default = "default_voice")]
    pub voice: String,
    /// Relative rate for whole-phrase playback (1.0 = synthesizer default)
    #[serde(default = "default_rate")]
    pub rate: f32,
    /// Relative rate for word-by-word playback
    #[serde(default = "default_slow_rate")]
    pub slow_rate: f32,
    /// Pause after each word in word-by-word playback
    #[serde(default = "default_word_gap_ms")]
    pub word_gap_ms: u64,
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            voice: default_voice(),
            rate: default_rate(),
            slow_rate: default_slow_rate(),
            word_gap_ms: default_word_gap_ms(),
            program: default_program(),
        }
    }
}
