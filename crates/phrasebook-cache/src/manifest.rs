use serde::{Deserialize, Serialize};

/// Web-app style manifest stored alongside the installed cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppManifest {
    pub short_name: String,
    pub name: String,
    pub start_url: String,
    pub display: String,
    pub theme_color: String,
    pub background_color: String,
}

impl Default for AppManifest {
    fn default() -> Self {
        Self {
            short_name: "Bengali-Italian".to_string(),
            name: "Bengali-Italian Phrasebook".to_string(),
            start_url: ".".to_string(),
            display: "standalone".to_string(),
            theme_color: "#ffffff".to_string(),
            background_color: "#f1f5f9".to_string(),
        }
    }
}

impl AppManifest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_uses_web_keys() {
        let json = AppManifest::default().to_json().unwrap();
        assert!(json.contains("\"short_name\": \"Bengali-Italian\""));
        assert!(json.contains("\"display\": \"standalone\""));
    }
}
