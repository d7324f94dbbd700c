use async_trait::async_trait;

use crate::error::FetchError;

mod request;

pub use request::RequestFetcher;

/// Retrieves the raw HTML of a page. Implementations never retry and never
/// return partial content.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
