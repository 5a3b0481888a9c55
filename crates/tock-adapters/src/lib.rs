//! Tock adapters - Infrastructure implementations
//!
//! This crate contains concrete implementations of the ports defined in tock-core.
//! It bridges the domain logic with the network.

pub mod http;
pub mod testing;

pub use http::HttpResourceFetcher;
pub use testing::{FailingResourceFetcher, StubResourceFetcher};
