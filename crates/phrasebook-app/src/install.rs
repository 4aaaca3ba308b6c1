use std::sync::Arc;

use async_trait::async_trait;
use phrasebook_cache::{AppManifest, AssetCache};
use phrasebook_core::InstallOffer;
use phrasebook_types::InstallOutcome;

/// Offer to make the current cache version available offline
pub struct CacheInstallOffer {
    cache: Arc<AssetCache>,
    assets: Vec<String>,
}

impl CacheInstallOffer {
    pub fn new(cache: Arc<AssetCache>, assets: Vec<String>) -> Self {
        Self { cache, assets }
    }
}

#[async_trait]
impl InstallOffer for CacheInstallOffer {
    async fn prompt(&self, choice: InstallOutcome) -> InstallOutcome {
        if choice == InstallOutcome::Dismissed {
            return choice;
        }

        match self.cache.install(&self.assets).await {
            Ok(count) => {
                tracing::info!("Cached {} assets in {}", count, self.cache.name());
                if let Err(e) = self.cache.write_manifest(&AppManifest::default()).await {
                    tracing::warn!("Failed to write app manifest: {}", e);
                }
                if let Err(e) = self.cache.activate().await {
                    tracing::warn!("Failed to remove old caches: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Failed to cache assets during install: {}", e);
            }
        }

        choice
    }
}
