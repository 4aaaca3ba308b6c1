use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use phrasebook_config::speech::SpeechConfig;
use tokio::process::Command;

use crate::{SpeechEngine, SpeechError, Utterance};

/// eSpeak NG default speed in words per minute
const DEFAULT_WPM: f32 = 175.0;

/// Speaks by running an `espeak-ng` compatible program, one process per utterance
pub struct EspeakEngine {
    program: String,
    voice: String,
    resolved: Option<PathBuf>,
}

impl EspeakEngine {
    pub fn new(program: impl Into<String>, voice: impl Into<String>) -> Self {
        let program = program.into();
        let resolved = find_program(&program);
        match &resolved {
            Some(path) => tracing::info!("Speech engine found at {}", path.display()),
            None => tracing::warn!("Speech program '{}' not found, speech disabled", program),
        }

        Self {
            program,
            voice: voice.into(),
            resolved,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.program.clone(), config.voice.clone())
    }

    /// Configured voice, or the primary subtag of the utterance language (`it-IT` -> `it`)
    fn voice_for(&self, utterance: &Utterance) -> Option<String> {
        if !self.voice.is_empty() {
            return Some(self.voice.clone());
        }
        utterance
            .language
            .split(['-', '_'])
            .next()
            .filter(|tag| !tag.is_empty())
            .map(str::to_ascii_lowercase)
    }

    fn words_per_minute(rate: f32) -> u32 {
        (DEFAULT_WPM * rate.clamp(0.1, 4.0)).round() as u32
    }
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    fn is_available(&self) -> bool {
        self.resolved.is_some()
    }

    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let program = self.resolved.as_ref().ok_or(SpeechError::Unavailable)?;

        tracing::debug!(
            "Speaking {:?} ({}, rate {})",
            utterance.text,
            utterance.language,
            utterance.rate
        );

        let mut command = Command::new(program);
        if let Some(voice) = self.voice_for(utterance) {
            command.arg("-v").arg(voice);
        }

        let mut child = command
            .arg("-s")
            .arg(Self::words_per_minute(utterance.rate).to_string())
            .arg("--")
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SpeechError::Unavailable,
                _ => SpeechError::IoError(e),
            })?;

        let status = child.wait().await?;
        if !status.success() {
            return Err(SpeechError::Engine(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Resolve a program name against PATH, or check an explicit path
fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_maps_to_words_per_minute() {
        assert_eq!(EspeakEngine::words_per_minute(1.0), 175);
        assert_eq!(EspeakEngine::words_per_minute(2.0), 350);
        assert_eq!(EspeakEngine::words_per_minute(0.4), 70);
        // clamped
        assert_eq!(EspeakEngine::words_per_minute(0.0), 18);
    }

    fn utterance(language: &str) -> Utterance {
        Utterance {
            text: "Ciao".to_string(),
            language: language.to_string(),
            rate: 0.9,
        }
    }

    #[test]
    fn voice_falls_back_to_language() {
        let engine = EspeakEngine::new("/nonexistent/espeak-ng-for-tests", "");
        assert_eq!(engine.voice_for(&utterance("it-IT")), Some("it".to_string()));
        assert_eq!(engine.voice_for(&utterance("BN_bd")), Some("bn".to_string()));
        assert_eq!(engine.voice_for(&utterance("")), None);

        let engine = EspeakEngine::new("/nonexistent/espeak-ng-for-tests", "it+f3");
        assert_eq!(engine.voice_for(&utterance("it-IT")), Some("it+f3".to_string()));
    }

    #[test]
    fn missing_program_is_unavailable() {
        let engine = EspeakEngine::new("/nonexistent/espeak-ng-for-tests", "it");
        assert!(!engine.is_available());
    }

    #[tokio::test]
    async fn speaking_without_program_reports_unavailable() {
        let engine = EspeakEngine::new("definitely-not-a-speech-program", "it");
        assert!(matches!(
            engine.speak(&utterance("it-IT")).await,
            Err(SpeechError::Unavailable)
        ));
    }
}
