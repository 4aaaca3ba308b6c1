use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the phrase list comes from. With neither set the embedded list is used.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub path: Option<PathBuf>,
    /// Fetched through the asset cache
    pub url: Option<String>,
}
