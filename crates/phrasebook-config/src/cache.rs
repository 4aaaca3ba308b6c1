use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_name() -> String {
    "bengali-italian-phrasebook".to_string()
}

fn default_version() -> String {
    "v7".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".phrasebook-cache")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_name")]
    pub name: String,
    /// Bumping the version retires every older cache on activation
    #[serde(default = "default_version")]
    pub version: String,
    /// Directory holding one sub-directory per cache name
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Origin served cache-first, e.g. `https://phrasebook.example`
    pub scope: Option<String>,
    /// Assets fetched on install
    #[serde(default)]
    pub assets: Vec<String>,
}

impl CacheConfig {
    /// Versioned name, e.g. `bengali-italian-phrasebook-v7`
    pub fn cache_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            name: default_name(),
            version: default_version(),
            root: default_root(),
            scope: None,
            assets: vec![],
        }
    }
}
