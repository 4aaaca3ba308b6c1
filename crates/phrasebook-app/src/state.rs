use std::sync::Arc;

use phrasebook_cache::AssetCache;
use phrasebook_config::Config;
use phrasebook_core::PhraseStore;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub store: Arc<PhraseStore>,
    /// None when the offline cache is disabled
    pub cache: Option<Arc<AssetCache>>,
}

impl AppState {
    pub fn new(config: Config, store: PhraseStore, cache: Option<Arc<AssetCache>>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            store: Arc::new(store),
            cache,
        }
    }
}
