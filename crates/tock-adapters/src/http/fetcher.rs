use std::io::Read;
use std::time::Duration;

use async_trait::async_trait;
use tock_core::{FetchError, Resource, ResourceFetcher};
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

pub struct HttpResourceFetcher {
    agent: ureq::Agent,
}

impl HttpResourceFetcher {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }

    fn handle_error(url: &str, error: ureq::Error) -> FetchError {
        match error {
            ureq::Error::Status(404, _) => FetchError::NotFound {
                url: url.to_string(),
            },
            ureq::Error::Status(status, _) => FetchError::Status {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => FetchError::Network {
                message: transport.to_string(),
            },
        }
    }
}

impl Default for HttpResourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch_blocking(agent: &ureq::Agent, url: &str) -> Result<Resource, FetchError> {
    let response = agent
        .get(url)
        .call()
        .map_err(|error| HttpResourceFetcher::handle_error(url, error))?;

    let content_type = Some(response.content_type().to_string()).filter(|value| !value.is_empty());

    let mut body = Vec::new();
    response
        .into_reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut body)
        .map_err(|error| FetchError::Body {
            message: error.to_string(),
        })?;

    Ok(Resource::new(url, content_type, body))
}

#[async_trait]
impl ResourceFetcher for HttpResourceFetcher {
    async fn fetch(&self, url: &str) -> Result<Resource, FetchError> {
        let agent = self.agent.clone();
        let owned_url = url.to_string();

        let resource = tokio::task::spawn_blocking(move || fetch_blocking(&agent, &owned_url))
            .await
            .map_err(|error| FetchError::Network {
                message: format!("task join error: {}", error),
            })??;

        debug!(url, bytes = resource.body.len(), "resource fetched from network");

        Ok(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let fetcher = HttpResourceFetcher::with_timeout(Duration::from_millis(500));

        let result = fetcher.fetch("http://127.0.0.1:9/app.js").await;

        assert!(matches!(result, Err(FetchError::Network { .. })));
    }
}
