use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use phrasebook_config::Config;
use serde_json::Value;

/// Config file picked up from the working directory when none is given
const DEFAULT_CONFIG_FILE: &str = "phrasebook.json";

/// Environment defaults, overridden key by key by the config file when one exists
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let base = Config::new();
    let config = match path {
        Some(path) => load_config_file(base, path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                load_config_file(base, default_path)?
            } else {
                tracing::info!("No config file, using defaults and environment");
                base
            }
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Reject settings the app cannot start with
pub fn validate(config: &Config) -> anyhow::Result<()> {
    anyhow::ensure!(config.ui.page_size > 0, "ui.page_size must be at least 1");
    Ok(())
}

/// Lay the keys present in the file over `base`
fn load_config_file(base: Config, path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let overrides: Value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let mut merged = serde_json::to_value(base)?;
    merge(&mut merged, overrides);

    serde_json::from_value(merged).with_context(|| format!("Invalid config in {}", path.display()))
}

fn merge(target: &mut Value, overrides: Value) {
    match (target, overrides) {
        (Value::Object(target), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match target.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, value) => *target = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "ui": { "page_size": 5 } }"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.ui.page_size, 5);
        assert_eq!(config.ui.debounce_ms, 300);
    }

    #[test]
    fn file_overrides_only_its_own_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "ui": { "page_size": 5 }, "cache": { "scope": null } }"#)
            .unwrap();

        let mut base = Config::default();
        base.speech.program = "/opt/speech/espeak-ng".to_string();
        base.ui.debounce_ms = 120;
        base.cache.scope = Some("https://phrasebook.example".to_string());

        let config = load_config_file(base, &path).unwrap();
        assert_eq!(config.ui.page_size, 5);
        assert_eq!(config.ui.debounce_ms, 120);
        assert_eq!(config.speech.program, "/opt/speech/espeak-ng");
        assert!(config.cache.scope.is_none());
    }

    #[test]
    fn environment_survives_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "ui": { "page_size": 5 } }"#).unwrap();

        // only this test reads the speech program from the environment
        unsafe { std::env::set_var("PHRASEBOOK_TTS_PROGRAM", "/opt/speech/espeak-ng") };
        let config = load_config(Some(&path));
        unsafe { std::env::remove_var("PHRASEBOOK_TTS_PROGRAM") };

        let config = config.unwrap();
        assert_eq!(config.ui.page_size, 5);
        assert_eq!(config.speech.program, "/opt/speech/espeak-ng");
    }

    #[test]
    fn zero_page_size_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.json");
        std::fs::write(&path, r#"{ "ui": { "page_size": 0 } }"#).unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/phrasebook.json"))).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ ui: ").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
