use std::sync::{Arc, Mutex};
use std::time::Duration;

use phrasebook_config::speech::SpeechConfig;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{SpeechEngine, SpeechError, Utterance};

#[derive(Debug, Clone)]
pub struct PlaybackSettings {
    pub language: String,
    pub rate: f32,
    pub slow_rate: f32,
    /// Pause after a word finishes before the next one starts
    pub word_gap: Duration,
}

impl From<&SpeechConfig> for PlaybackSettings {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            language: config.language.clone(),
            rate: config.rate,
            slow_rate: config.slow_rate,
            word_gap: Duration::from_millis(config.word_gap_ms),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self::from(&SpeechConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Speaking {
        token_index: usize,
        token_count: usize,
    },
}

/// Playback state tagged with the request that owns it, so a superseded
/// chain cannot overwrite the state of its successor.
#[derive(Debug)]
struct Tracker {
    generation: u64,
    state: PlaybackState,
}

impl Tracker {
    fn set(&mut self, generation: u64, state: PlaybackState) {
        if self.generation == generation {
            self.state = state;
        }
    }
}

struct ActivePlayback {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drives the engine for whole-phrase and word-by-word playback.
/// At most one utterance is in flight; every request cancels the previous one.
pub struct SpeechPlayer {
    engine: Arc<dyn SpeechEngine>,
    settings: PlaybackSettings,
    tracker: Arc<Mutex<Tracker>>,
    active: Option<ActivePlayback>,
}

impl SpeechPlayer {
    pub fn new(engine: Arc<dyn SpeechEngine>, settings: PlaybackSettings) -> Self {
        Self {
            engine,
            settings,
            tracker: Arc::new(Mutex::new(Tracker {
                generation: 0,
                state: PlaybackState::Idle,
            })),
            active: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.tracker
            .lock()
            .map(|t| t.state)
            .unwrap_or(PlaybackState::Idle)
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    /// Speak `text` as one utterance at the normal rate
    pub fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.ensure_available()?;
        self.stop();

        let utterance = Utterance {
            text: text.to_string(),
            language: self.settings.language.clone(),
            rate: self.settings.rate,
        };
        self.start(vec![utterance], Duration::ZERO);
        Ok(())
    }

    /// Speak `text` word by word at the slow rate
    pub fn speak_slowly(&mut self, text: &str) -> Result<(), SpeechError> {
        self.ensure_available()?;
        self.stop();

        let utterances: Vec<Utterance> = text
            .split_whitespace()
            .map(|word| Utterance {
                text: word.to_string(),
                language: self.settings.language.clone(),
                rate: self.settings.slow_rate,
            })
            .collect();

        if utterances.is_empty() {
            return Ok(());
        }

        self.start(utterances, self.settings.word_gap);
        Ok(())
    }

    /// Cancel any in-flight speech and return to idle
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
        if let Ok(mut tracker) = self.tracker.lock() {
            tracker.generation += 1;
            tracker.state = PlaybackState::Idle;
        }
    }

    /// Wait until the current playback finished or was cancelled
    pub async fn wait(&mut self) {
        if let Some(active) = self.active.take()
            && let Err(e) = active.handle.await
        {
            tracing::error!("Speech task panicked: {}", e);
        }
    }

    fn ensure_available(&self) -> Result<(), SpeechError> {
        if self.engine.is_available() {
            Ok(())
        } else {
            tracing::warn!("Speech requested but {} is unavailable", self.engine.name());
            Err(SpeechError::Unavailable)
        }
    }

    fn start(&mut self, utterances: Vec<Utterance>, gap: Duration) {
        let generation = match self.tracker.lock() {
            Ok(mut tracker) => {
                tracker.generation += 1;
                tracker.generation
            }
            Err(_) => return,
        };

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let engine = self.engine.clone();
        let tracker = self.tracker.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Speech cancelled");
                }
                result = play_sequence(engine.as_ref(), &utterances, gap, &tracker, generation) => {
                    if let Err(e) = result {
                        tracing::warn!("Speech failed: {}", e);
                    }
                }
            }

            if let Ok(mut tracker) = tracker.lock() {
                tracker.set(generation, PlaybackState::Idle);
            }
        });

        self.active = Some(ActivePlayback { cancel, handle });
    }
}

impl Drop for SpeechPlayer {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }
}

async fn play_sequence(
    engine: &dyn SpeechEngine,
    utterances: &[Utterance],
    gap: Duration,
    tracker: &Mutex<Tracker>,
    generation: u64,
) -> Result<(), SpeechError> {
    let token_count = utterances.len();

    for (token_index, utterance) in utterances.iter().enumerate() {
        if let Ok(mut tracker) = tracker.lock() {
            tracker.set(
                generation,
                PlaybackState::Speaking {
                    token_index,
                    token_count,
                },
            );
        }

        engine.speak(utterance).await?;

        if token_index + 1 < token_count && !gap.is_zero() {
            tokio::time::sleep(gap).await;
        }
    }

    Ok(())
}
