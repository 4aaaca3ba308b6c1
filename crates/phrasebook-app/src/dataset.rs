use anyhow::Context;
use phrasebook_cache::{AssetCache, AssetRequest, Fetcher, HttpFetcher};
use phrasebook_config::data::DataConfig;
use phrasebook_core::PhraseStore;

/// Load the phrase list: file path first, then URL, then the embedded list
pub async fn load_store(data: &DataConfig, cache: Option<&AssetCache>) -> anyhow::Result<PhraseStore> {
    if let Some(path) = &data.path {
        return PhraseStore::load_from_file(path)
            .with_context(|| format!("Failed to load phrases from {}", path.display()));
    }

    if let Some(url) = &data.url {
        let request = AssetRequest::get(url.clone());
        let asset = match cache {
            Some(cache) => cache.fetch(&request).await,
            None => HttpFetcher::new().fetch(&request).await,
        }
        .with_context(|| format!("Failed to fetch phrases from {url}"))?;

        if !asset.is_ok() {
            anyhow::bail!("Failed to fetch phrases from {url}: HTTP {}", asset.status);
        }

        tracing::info!(
            "Loading phrases from {} ({})",
            url,
            if asset.from_cache { "cache" } else { "network" }
        );
        return PhraseStore::from_json(asset.text()?)
            .with_context(|| format!("Failed to parse phrases from {url}"));
    }

    Ok(PhraseStore::load_embedded()?)
}
