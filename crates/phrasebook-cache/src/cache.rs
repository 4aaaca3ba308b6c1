use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use phrasebook_config::cache::CacheConfig;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use crate::manifest::AppManifest;
use crate::{Asset, AssetRequest, CacheError, Fetcher};

const INDEX_FILE: &str = "index.json";
const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheIndex {
    entries: BTreeMap<String, IndexEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    file: String,
    content_type: Option<String>,
    stored_at: u64,
}

/// Versioned on-disk asset cache.
///
/// Layout: `<root>/<cache name>/index.json` maps URLs to blob files stored in
/// the same directory. Only one cache name is current; `activate` removes the
/// others.
pub struct AssetCache {
    root: PathBuf,
    name: String,
    scope: Option<Url>,
    fetcher: Arc<dyn Fetcher>,
    index_lock: Mutex<()>,
}

impl AssetCache {
    pub fn new(
        root: impl Into<PathBuf>,
        name: impl Into<String>,
        scope: Option<&str>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, CacheError> {
        let scope = scope
            .map(|s| Url::parse(s).map_err(|e| CacheError::InvalidUrl(format!("{s}: {e}"))))
            .transpose()?;

        Ok(Self {
            root: root.into(),
            name: name.into(),
            scope,
            fetcher,
            index_lock: Mutex::new(()),
        })
    }

    pub fn from_config(config: &CacheConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self, CacheError> {
        Self::new(
            config.root.clone(),
            config.cache_name(),
            config.scope.as_deref(),
            fetcher,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    /// Whether the current version has been installed
    pub async fn is_installed(&self) -> bool {
        fs::try_exists(self.dir().join(INDEX_FILE))
            .await
            .unwrap_or(false)
    }

    /// Fetch and store every asset. Nothing is stored unless all of them succeed.
    pub async fn install(&self, assets: &[String]) -> Result<usize, CacheError> {
        tracing::info!("Caching app shell ({} assets) into {}", assets.len(), self.name);

        let mut fetched = Vec::with_capacity(assets.len());
        for url in assets {
            let asset = self
                .fetcher
                .fetch(&AssetRequest::get(url.clone()))
                .await
                .map_err(|e| CacheError::Install {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;

            if !asset.is_ok() {
                return Err(CacheError::Install {
                    url: url.clone(),
                    reason: format!("HTTP {}", asset.status),
                });
            }
            fetched.push(asset);
        }

        self.store_all(&fetched).await?;
        Ok(fetched.len())
    }

    /// Write every blob, then index them in a single index write.
    /// On failure the blobs written so far are removed and the index is untouched.
    async fn store_all(&self, assets: &[Asset]) -> Result<(), CacheError> {
        let _guard = self.index_lock.lock().await;
        let dir = self.dir();
        fs::create_dir_all(&dir).await?;

        let mut written = Vec::with_capacity(assets.len());
        let result = async {
            for asset in assets {
                let file = blob_name();
                fs::write(dir.join(&file), &asset.body).await?;
                written.push(file);
            }

            let mut index = self.read_index().await?;
            let stored_at = now_secs();
            let mut replaced = Vec::new();
            for (asset, file) in assets.iter().zip(&written) {
                let entry = IndexEntry {
                    file: file.clone(),
                    content_type: asset.content_type.clone(),
                    stored_at,
                };
                if let Some(previous) = index.entries.insert(asset.url.clone(), entry) {
                    replaced.push(previous.file);
                }
            }
            // an empty asset list still marks the version as installed
            self.write_index(&index).await?;
            Ok::<_, CacheError>(replaced)
        }
        .await;

        match result {
            Ok(replaced) => {
                for file in replaced {
                    let _ = fs::remove_file(dir.join(file)).await;
                }
                Ok(())
            }
            Err(e) => {
                for file in &written {
                    let _ = fs::remove_file(dir.join(file)).await;
                }
                Err(e)
            }
        }
    }

    pub async fn write_manifest(&self, manifest: &AppManifest) -> Result<(), CacheError> {
        fs::create_dir_all(self.dir()).await?;
        fs::write(self.dir().join(MANIFEST_FILE), manifest.to_json()?).await?;
        Ok(())
    }

    /// Serve a request cache-first.
    ///
    /// Non-GET and out-of-scope requests go straight to the network. In-scope
    /// misses are fetched and stored when the response is a 200.
    pub async fn fetch(&self, request: &AssetRequest) -> Result<Asset, CacheError> {
        if request.method != Method::GET || !self.in_scope(&request.url)? {
            return self.fetcher.fetch(request).await;
        }

        if let Some(cached) = self.lookup(&request.url).await? {
            tracing::debug!("Cache hit: {}", request.url);
            return Ok(cached);
        }

        let response = self.fetcher.fetch(request).await?;
        if response.is_ok()
            && let Err(e) = self.put(&request.url, &response).await
        {
            tracing::warn!("Failed to cache {}: {}", request.url, e);
        }

        Ok(response)
    }

    /// Cached copy of `url`, if any
    pub async fn lookup(&self, url: &str) -> Result<Option<Asset>, CacheError> {
        let index = self.read_index().await?;
        let Some(entry) = index.entries.get(url) else {
            return Ok(None);
        };

        match fs::read(self.dir().join(&entry.file)).await {
            Ok(body) => Ok(Some(Asset {
                url: url.to_string(),
                status: 200,
                content_type: entry.content_type.clone(),
                body,
                from_cache: true,
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Cache entry for {} lost its blob", url);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Store `asset` under `url`, replacing an existing entry
    pub async fn put(&self, url: &str, asset: &Asset) -> Result<(), CacheError> {
        let _guard = self.index_lock.lock().await;
        let dir = self.dir();
        fs::create_dir_all(&dir).await?;

        let file = blob_name();
        fs::write(dir.join(&file), &asset.body).await?;

        let mut index = self.read_index().await?;
        let stored_at = now_secs();
        let previous = index.entries.insert(
            url.to_string(),
            IndexEntry {
                file,
                content_type: asset.content_type.clone(),
                stored_at,
            },
        );
        self.write_index(&index).await?;

        if let Some(previous) = previous {
            let _ = fs::remove_file(dir.join(previous.file)).await;
        }

        Ok(())
    }

    /// Delete every cache directory other than the current one.
    /// Returns the names of the deleted caches.
    pub async fn activate(&self) -> Result<Vec<String>, CacheError> {
        let mut deleted = Vec::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(deleted),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != self.name {
                tracing::info!("Deleting old cache {}", name);
                fs::remove_dir_all(entry.path()).await?;
                deleted.push(name);
            }
        }

        deleted.sort();
        Ok(deleted)
    }

    fn in_scope(&self, url: &str) -> Result<bool, CacheError> {
        let Some(scope) = &self.scope else {
            return Ok(true);
        };
        let url = Url::parse(url).map_err(|e| CacheError::InvalidUrl(format!("{url}: {e}")))?;
        Ok(url.origin() == scope.origin())
    }

    async fn read_index(&self) -> Result<CacheIndex, CacheError> {
        read_index_at(&self.dir()).await
    }

    async fn write_index(&self, index: &CacheIndex) -> Result<(), CacheError> {
        let dir = self.dir();
        fs::create_dir_all(&dir).await?;
        let tmp = dir.join(format!("{INDEX_FILE}.tmp"));
        fs::write(&tmp, serde_json::to_vec_pretty(index)?).await?;
        fs::rename(&tmp, dir.join(INDEX_FILE)).await?;
        Ok(())
    }
}

fn blob_name() -> String {
    format!("{}.bin", uuid::Uuid::new_v4())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

async fn read_index_at(dir: &Path) -> Result<CacheIndex, CacheError> {
    match fs::read(dir.join(INDEX_FILE)).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CacheIndex::default()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Serves canned responses and counts network hits
    #[derive(Default)]
    struct MockFetcher {
        responses: HashMap<String, (u16, &'static str)>,
        calls: AtomicUsize,
    }

    impl MockFetcher {
        fn with(responses: &[(&str, u16, &'static str)]) -> Arc<Self> {
            Arc::new(Self {
                responses: responses
                    .iter()
                    .map(|(url, status, body)| (url.to_string(), (*status, *body)))
                    .collect(),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, request: &AssetRequest) -> Result<Asset, CacheError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (status, body) = self
                .responses
                .get(&request.url)
                .ok_or_else(|| CacheError::Fetch(format!("offline: {}", request.url)))?;
            Ok(Asset {
                url: request.url.clone(),
                status: *status,
                content_type: Some("text/plain".to_string()),
                body: body.as_bytes().to_vec(),
                from_cache: false,
            })
        }
    }

    const INDEX: &str = "https://phrasebook.example/index.html";
    const DATA: &str = "https://phrasebook.example/phrases.json";
    const MISSING: &str = "https://phrasebook.example/missing.png";

    fn fetcher() -> Arc<MockFetcher> {
        MockFetcher::with(&[
            (INDEX, 200, "<html></html>"),
            (DATA, 200, "[]"),
            (MISSING, 404, "not found"),
        ])
    }

    fn cache(root: &Path, fetcher: Arc<MockFetcher>) -> AssetCache {
        AssetCache::new(
            root,
            "phrasebook-v2",
            Some("https://phrasebook.example"),
            fetcher,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn install_stores_every_asset() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher();
        let cache = cache(dir.path(), fetcher.clone());

        assert!(!cache.is_installed().await);
        let stored = cache
            .install(&[INDEX.to_string(), DATA.to_string()])
            .await
            .unwrap();
        assert_eq!(stored, 2);
        assert!(cache.is_installed().await);

        let cached = cache.lookup(DATA).await.unwrap().unwrap();
        assert_eq!(cached.body, b"[]");
        assert!(cached.from_cache);
    }

    #[tokio::test]
    async fn failed_install_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path(), fetcher());

        let result = cache.install(&[INDEX.to_string(), MISSING.to_string()]).await;
        assert!(matches!(result, Err(CacheError::Install { .. })));
        assert!(!cache.is_installed().await);
        assert!(cache.lookup(INDEX).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_index_write_removes_written_blobs() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path(), fetcher());

        // an index that cannot be read or replaced
        let blocked = cache.dir().join(INDEX_FILE);
        std::fs::create_dir_all(blocked.join("occupied")).unwrap();

        let result = cache.install(&[INDEX.to_string(), DATA.to_string()]).await;
        assert!(result.is_err());

        let blobs = std::fs::read_dir(cache.dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "bin"))
            .count();
        assert_eq!(blobs, 0);
    }

    #[tokio::test]
    async fn cached_assets_skip_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher();
        let cache = cache(dir.path(), fetcher.clone());

        let first = cache.fetch(&AssetRequest::get(INDEX)).await.unwrap();
        assert!(!first.from_cache);
        assert_eq!(fetcher.calls(), 1);

        let second = cache.fetch(&AssetRequest::get(INDEX)).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.body, b"<html></html>");
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn error_responses_are_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher();
        let cache = cache(dir.path(), fetcher.clone());

        let response = cache.fetch(&AssetRequest::get(MISSING)).await.unwrap();
        assert_eq!(response.status, 404);
        assert!(cache.lookup(MISSING).await.unwrap().is_none());

        cache.fetch(&AssetRequest::get(MISSING)).await.unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn non_get_and_foreign_requests_bypass_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let foreign = "https://cdn.example/lib.js";
        let fetcher = MockFetcher::with(&[(INDEX, 200, "<html></html>"), (foreign, 200, "lib")]);
        let cache = cache(dir.path(), fetcher.clone());

        let post = AssetRequest {
            method: Method::POST,
            url: INDEX.to_string(),
        };
        cache.fetch(&post).await.unwrap();
        assert!(cache.lookup(INDEX).await.unwrap().is_none());

        cache.fetch(&AssetRequest::get(foreign)).await.unwrap();
        cache.fetch(&AssetRequest::get(foreign)).await.unwrap();
        assert!(cache.lookup(foreign).await.unwrap().is_none());
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test]
    async fn activate_removes_only_stale_versions() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher();

        let old = AssetCache::new(dir.path(), "phrasebook-v1", None, fetcher.clone()).unwrap();
        old.install(&[INDEX.to_string()]).await.unwrap();
        let current = cache(dir.path(), fetcher.clone());
        current.install(&[DATA.to_string()]).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        let deleted = current.activate().await.unwrap();
        assert_eq!(deleted, vec!["phrasebook-v1".to_string()]);
        assert!(!old.is_installed().await);
        assert!(current.is_installed().await);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn activate_without_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(&dir.path().join("absent"), fetcher());
        assert!(cache.activate().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn manifest_is_written_into_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path(), fetcher());
        cache.write_manifest(&AppManifest::default()).await.unwrap();
        let json = std::fs::read_to_string(cache.dir().join(MANIFEST_FILE)).unwrap();
        assert!(json.contains("Bengali-Italian Phrasebook"));
    }
}
