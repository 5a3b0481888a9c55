mod failing_fetcher;
mod stub_fetcher;

pub use failing_fetcher::FailingResourceFetcher;
pub use stub_fetcher::StubResourceFetcher;
