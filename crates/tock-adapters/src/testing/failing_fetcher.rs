use async_trait::async_trait;
use tock_core::{FetchError, Resource, ResourceFetcher};

pub struct FailingResourceFetcher {
    error: FetchError,
}

impl FailingResourceFetcher {
    pub fn network_error() -> Self {
        Self {
            error: FetchError::Network {
                message: "connection refused".to_string(),
            },
        }
    }

    pub fn with_error(error: FetchError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl ResourceFetcher for FailingResourceFetcher {
    async fn fetch(&self, _url: &str) -> Result<Resource, FetchError> {
        Err(self.error.clone())
    }
}
