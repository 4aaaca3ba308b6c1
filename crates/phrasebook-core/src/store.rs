use std::collections::HashSet;
use std::path::Path;

use phrasebook_types::Phrase;

use crate::error::LoadError;

/// Immutable, ordered phrase list
#[derive(Debug, Clone, Default)]
pub struct PhraseStore {
    phrases: Vec<Phrase>,
}

impl PhraseStore {
    pub fn new(phrases: Vec<Phrase>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(phrases.len());
        for phrase in &phrases {
            if !seen.insert(phrase.id) {
                return Err(LoadError::DuplicateId(phrase.id));
            }
        }
        Ok(Self { phrases })
    }

    /// Parse a JSON array of phrases
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let phrases: Vec<Phrase> = serde_json::from_str(json)?;
        Self::new(phrases)
    }

    /// Load the phrase list compiled into the binary
    pub fn load_embedded() -> Result<Self, LoadError> {
        let json = include_str!("../data/phrases.json");
        tracing::info!("Loading embedded phrase list...");
        let store = Self::from_json(json)?;
        tracing::info!("Loaded {} phrases", store.len());
        Ok(store)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }
        tracing::info!("Loading phrases from file: {}", path.display());
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json(&json)?;
        tracing::info!("Loaded {} phrases from file", store.len());
        Ok(store)
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn get(&self, index: usize) -> Option<&Phrase> {
        self.phrases.get(index)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_list_loads() {
        let store = PhraseStore::load_embedded().unwrap();
        assert_eq!(store.len(), 45);
        assert_eq!(store.get(0).map(|p| p.target.as_str()), Some("Ciao"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            {"id":1,"source":"a","gloss":"b","target":"c","pronunciation":"d"},
            {"id":1,"source":"e","gloss":"f","target":"g","pronunciation":"h"}
        ]"#;
        assert!(matches!(
            PhraseStore::from_json(json),
            Err(LoadError::DuplicateId(1))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = PhraseStore::load_from_file(Path::new("/nonexistent/phrases.json")).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }
}
