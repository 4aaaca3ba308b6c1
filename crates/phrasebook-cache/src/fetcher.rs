use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::{Asset, AssetRequest, CacheError, Fetcher};

#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &AssetRequest) -> Result<Asset, CacheError> {
        let response = self
            .client
            .request(request.method.clone(), &request.url)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        tracing::debug!("Fetched {} ({}, {} bytes)", request.url, status, body.len());

        Ok(Asset {
            url: request.url.clone(),
            status,
            content_type,
            body,
            from_cache: false,
        })
    }
}
