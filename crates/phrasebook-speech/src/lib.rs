pub mod espeak;
pub mod player;

pub use espeak::EspeakEngine;
pub use player::{PlaybackSettings, PlaybackState, SpeechPlayer};

/// A single request to the synthesizer
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 language tag, e.g. `it-IT`
    pub language: String,
    /// Relative rate, 1.0 is the synthesizer default
    pub rate: f32,
}

/// Platform text-to-speech
#[async_trait::async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Whether the platform capability exists at all
    fn is_available(&self) -> bool;

    /// Resolves once the utterance finished playing.
    /// Dropping the future stops playback.
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Engine name for logs
    fn name(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Sorry, text-to-speech is not available on this system.")]
    Unavailable,

    #[error("Speech engine error: {0}")]
    Engine(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
