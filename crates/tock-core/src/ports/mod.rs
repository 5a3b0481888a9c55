mod resource_fetcher;

pub use resource_fetcher::{FetchError, ResourceFetcher};
