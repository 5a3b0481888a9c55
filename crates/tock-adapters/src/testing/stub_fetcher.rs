use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tock_core::{FetchError, Resource, ResourceFetcher};

/// Serves canned bodies and records every requested URL.
pub struct StubResourceFetcher {
    resources: Mutex<HashMap<String, Resource>>,
    requests: Mutex<Vec<String>>,
}

impl StubResourceFetcher {
    pub fn new() -> Self {
        Self {
            resources: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_bodies<'a>(bodies: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let stub = Self::new();
        for (url, body) in bodies {
            stub.given_body(url, body);
        }
        stub
    }

    pub fn given_body(&self, url: &str, body: &str) {
        let mut guard = self.resources.lock().unwrap();
        guard.insert(
            url.to_string(),
            Resource::new(url, Some("text/plain".to_string()), body.as_bytes().to_vec()),
        );
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for StubResourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceFetcher for StubResourceFetcher {
    async fn fetch(&self, url: &str) -> Result<Resource, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let resources = self.resources.lock().unwrap();
        resources.get(url).cloned().ok_or_else(|| FetchError::NotFound {
            url: url.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tock_core::OfflineCache;

    #[tokio::test]
    async fn serves_known_bodies() {
        let fetcher = StubResourceFetcher::with_bodies([("http://local/app.js", "console.log(1)")]);

        let resource = fetcher.fetch("http://local/app.js").await.unwrap();

        assert_eq!(resource.body, b"console.log(1)");
        assert_eq!(fetcher.requests(), vec!["http://local/app.js".to_string()]);
    }

    #[tokio::test]
    async fn unknown_url_is_not_found() {
        let fetcher = StubResourceFetcher::new();

        let result = fetcher.fetch("http://local/missing").await;

        assert!(matches!(result, Err(FetchError::NotFound { .. })));
    }

    #[tokio::test]
    async fn offline_cache_serves_installed_assets_without_refetching() {
        let fetcher = StubResourceFetcher::with_bodies([
            ("http://local/", "<html></html>"),
            ("http://local/app.js", "console.log(1)"),
        ]);
        let mut cache = OfflineCache::new(
            "tock-v1",
            "http://local",
            vec!["/".to_string(), "/app.js".to_string()],
        );
        cache.install(&fetcher).await.unwrap();

        let outcome = cache.fetch("/app.js", &fetcher).await.unwrap();

        assert!(outcome.is_cached());
        assert_eq!(fetcher.requests().len(), 2);
    }
}
