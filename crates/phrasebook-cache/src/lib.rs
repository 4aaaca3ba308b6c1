pub mod cache;
pub mod fetcher;
pub mod manifest;

pub use cache::AssetCache;
pub use fetcher::HttpFetcher;
pub use manifest::AppManifest;

use async_trait::async_trait;
use reqwest::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub method: Method,
    pub url: String,
}

impl AssetRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
        }
    }
}

/// A fetched or cached response
#[derive(Debug, Clone)]
pub struct Asset {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub from_cache: bool,
}

impl Asset {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> Result<&str, CacheError> {
        std::str::from_utf8(&self.body)
            .map_err(|e| CacheError::Fetch(format!("{} is not UTF-8: {}", self.url, e)))
    }
}

/// Network side of the cache
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &AssetRequest) -> Result<Asset, CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Failed to cache {url}: {reason}")]
    Install { url: String, reason: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Corrupt cache index: {0}")]
    IndexError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
