use std::sync::Arc;

use tock_core::{CacheConfig, CacheError, FetchError, FetchOutcome, OfflineCache, ResourceFetcher};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Offline asset cache shared by connection handlers.
pub struct AssetService {
    cache: RwLock<OfflineCache>,
    fetcher: Arc<dyn ResourceFetcher>,
}

impl AssetService {
    pub fn new(config: &CacheConfig, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        let cache = OfflineCache::new(
            config.name.clone(),
            config.base_url.clone(),
            config.assets.clone(),
        );

        Self {
            cache: RwLock::new(cache),
            fetcher,
        }
    }

    /// Install the current cache version, then drop every older one.
    ///
    /// Assets are downloaded under the read lock so lookups keep being served;
    /// the write lock is only taken to store them.
    pub async fn bootstrap(&self) -> Result<usize, CacheError> {
        let resources = self
            .cache
            .read()
            .await
            .download(self.fetcher.as_ref())
            .await?;

        let mut cache = self.cache.write().await;
        let installed = cache.commit(resources);
        info!(cache = cache.name(), installed, "offline cache installed");

        for name in cache.activate() {
            info!(cache = %name, "stale offline cache deleted");
        }

        Ok(installed)
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let cache = self.cache.read().await;
        let outcome = cache.fetch(url, self.fetcher.as_ref()).await?;
        debug!(url, cached = outcome.is_cached(), "asset served");
        Ok(outcome)
    }
}
