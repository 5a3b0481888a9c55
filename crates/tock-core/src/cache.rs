//! Offline copy of the static assets served alongside the timer.
//!
//! Mirrors the install / fetch / activate lifecycle of a browser offline
//! worker: a versioned named cache is populated up front, lookups are served
//! from any cache before falling back to the network, and activation drops
//! every cache whose name is not the current version tag.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::{FetchError, ResourceFetcher};

pub const DEFAULT_CACHE_NAME: &str = "tock-v1";
pub const DEFAULT_ASSETS: [&str; 5] = ["/", "/index.html", "/styles.css", "/app.js", "/manifest.json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Resource {
    pub fn new(url: impl Into<String>, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            content_type,
            body,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("failed to cache {url}: {source}")]
    Install {
        url: String,
        #[source]
        source: FetchError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Cached(Resource),
    Network(Resource),
}

impl FetchOutcome {
    pub fn is_cached(&self) -> bool {
        matches!(self, FetchOutcome::Cached(_))
    }

    pub fn into_resource(self) -> Resource {
        match self {
            FetchOutcome::Cached(resource) | FetchOutcome::Network(resource) => resource,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NamedCache {
    entries: HashMap<String, Resource>,
}

impl NamedCache {
    pub fn put(&mut self, resource: Resource) {
        self.entries.insert(resource.url.clone(), resource);
    }

    pub fn get(&self, url: &str) -> Option<&Resource> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All named caches known to the process.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: HashMap<String, NamedCache>,
}

impl CacheStorage {
    pub fn open(&mut self, name: &str) -> &mut NamedCache {
        self.caches.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&NamedCache> {
        self.caches.get(name)
    }

    pub fn delete(&mut self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.keys().cloned().collect();
        names.sort();
        names
    }

    /// Looks `url` up across every cache.
    pub fn find(&self, url: &str) -> Option<&Resource> {
        self.caches.values().find_map(|cache| cache.get(url))
    }
}

pub struct OfflineCache {
    name: String,
    base_url: String,
    assets: Vec<String>,
    storage: CacheStorage,
}

impl OfflineCache {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, assets: Vec<String>) -> Self {
        Self::with_storage(name, base_url, assets, CacheStorage::default())
    }

    pub fn with_storage(
        name: impl Into<String>,
        base_url: impl Into<String>,
        assets: Vec<String>,
        storage: CacheStorage,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            assets,
            storage,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Absolute URL for an asset path; absolute URLs pass through.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            url.to_string()
        }
    }

    /// Fetches every asset without touching the storage. Fails on the first asset that fails.
    pub async fn download(&self, fetcher: &dyn ResourceFetcher) -> Result<Vec<Resource>, CacheError> {
        let mut fetched = Vec::with_capacity(self.assets.len());

        for asset in &self.assets {
            let url = self.resolve(asset);
            let resource = fetcher
                .fetch(&url)
                .await
                .map_err(|source| CacheError::Install {
                    url: url.clone(),
                    source,
                })?;
            fetched.push(Resource { url, ..resource });
        }

        Ok(fetched)
    }

    /// Stores downloaded assets under the current cache name.
    pub fn commit(&mut self, resources: Vec<Resource>) -> usize {
        let count = resources.len();
        let cache = self.storage.open(&self.name);
        for resource in resources {
            cache.put(resource);
        }
        count
    }

    /// Fetches every asset, then stores them all. Nothing is stored if any fetch fails.
    pub async fn install(&mut self, fetcher: &dyn ResourceFetcher) -> Result<usize, CacheError> {
        let resources = self.download(fetcher).await?;
        Ok(self.commit(resources))
    }

    /// Serves `url` from any cache, falling back to the network.
    pub async fn fetch(
        &self,
        url: &str,
        fetcher: &dyn ResourceFetcher,
    ) -> Result<FetchOutcome, FetchError> {
        let url = self.resolve(url);

        if let Some(resource) = self.storage.find(&url) {
            return Ok(FetchOutcome::Cached(resource.clone()));
        }

        fetcher.fetch(&url).await.map(FetchOutcome::Network)
    }

    /// Deletes every cache except the current version. Returns the deleted names.
    pub fn activate(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .storage
            .names()
            .into_iter()
            .filter(|name| *name != self.name)
            .collect();

        for name in &stale {
            self.storage.delete(name);
        }

        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        calls: AtomicUsize,
        missing: Option<&'static str>,
    }

    impl CountingFetcher {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                missing: None,
            }
        }

        fn missing(url: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                missing: Some(url),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ResourceFetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<Resource, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.missing.is_some_and(|missing| url.ends_with(missing)) {
                return Err(FetchError::NotFound {
                    url: url.to_string(),
                });
            }
            Ok(Resource::new(url, None, url.as_bytes().to_vec()))
        }
    }

    fn default_cache() -> OfflineCache {
        OfflineCache::new(
            DEFAULT_CACHE_NAME,
            "http://localhost:8080/",
            DEFAULT_ASSETS.iter().map(|asset| asset.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn install_populates_named_cache() {
        let mut cache = default_cache();
        let fetcher = CountingFetcher::new();

        let count = cache.install(&fetcher).await.unwrap();

        assert_eq!(count, 5);
        let named = cache.storage().get(DEFAULT_CACHE_NAME).unwrap();
        assert_eq!(named.len(), 5);
        assert!(named.get("http://localhost:8080/app.js").is_some());
    }

    #[tokio::test]
    async fn failed_install_stores_nothing() {
        let mut cache = default_cache();
        let fetcher = CountingFetcher::missing("/styles.css");

        let result = cache.install(&fetcher).await;

        assert!(matches!(result, Err(CacheError::Install { ref url, .. }) if url.ends_with("/styles.css")));
        assert!(cache.storage().get(DEFAULT_CACHE_NAME).is_none());
    }

    #[tokio::test]
    async fn download_leaves_storage_untouched_until_commit() {
        let mut cache = default_cache();
        let fetcher = CountingFetcher::new();

        let resources = cache.download(&fetcher).await.unwrap();

        assert_eq!(resources.len(), 5);
        assert!(cache.storage().get(DEFAULT_CACHE_NAME).is_none());

        assert_eq!(cache.commit(resources), 5);
        assert_eq!(cache.storage().get(DEFAULT_CACHE_NAME).unwrap().len(), 5);
    }

    #[tokio::test]
    async fn cached_assets_skip_the_network() {
        let mut cache = default_cache();
        let fetcher = CountingFetcher::new();
        cache.install(&fetcher).await.unwrap();
        let calls_after_install = fetcher.calls();

        let outcome = cache.fetch("/index.html", &fetcher).await.unwrap();

        assert!(outcome.is_cached());
        assert_eq!(fetcher.calls(), calls_after_install);
        assert_eq!(outcome.into_resource().url, "http://localhost:8080/index.html");
    }

    #[tokio::test]
    async fn uncached_urls_fall_through_to_network() {
        let cache = default_cache();
        let fetcher = CountingFetcher::new();

        let outcome = cache
            .fetch("http://localhost:8080/icons/icon-192.png", &fetcher)
            .await
            .unwrap();

        assert!(!outcome.is_cached());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn network_errors_surface_on_cache_miss() {
        let cache = default_cache();
        let fetcher = CountingFetcher::missing("/missing.js");

        let result = cache.fetch("/missing.js", &fetcher).await;

        assert!(matches!(result, Err(FetchError::NotFound { .. })));
    }

    #[test]
    fn activate_deletes_stale_versions_only() {
        let mut storage = CacheStorage::default();
        storage
            .open("tock-v0")
            .put(Resource::new("http://localhost:8080/app.js", None, vec![1]));
        storage.open("legacy");
        storage.open(DEFAULT_CACHE_NAME);
        let mut cache = OfflineCache::with_storage(
            DEFAULT_CACHE_NAME,
            "http://localhost:8080",
            Vec::new(),
            storage,
        );

        let deleted = cache.activate();

        assert_eq!(deleted, vec!["legacy".to_string(), "tock-v0".to_string()]);
        assert_eq!(cache.storage().names(), vec![DEFAULT_CACHE_NAME.to_string()]);
    }

    #[test]
    fn resolve_joins_paths_to_base_url() {
        let cache = default_cache();

        assert_eq!(cache.resolve("/"), "http://localhost:8080/");
        assert_eq!(cache.resolve("https://example.com/x"), "https://example.com/x");
    }
}
