mod fetcher;

pub use fetcher::HttpResourceFetcher;
