//! Best-effort recipe extraction from arbitrary web pages.
//!
//! Embedded JSON-LD Recipe metadata is preferred; every field it leaves
//! empty falls back to a chain of DOM heuristics. Extraction itself never
//! fails. Only fetching the page can.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let recipe = cocinando_extract::fetch_recipe("https://example.com/tacos").await?;
//! println!("{}", serde_json::to_string_pretty(&recipe)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;
pub mod normalize;
pub mod pipelines;
pub mod store;

use std::time::Duration;

use log::debug;

pub use error::{FetchError, ImportError, StoreError};
pub use fetchers::{Fetcher, RequestFetcher};
pub use model::ExtractionResult;
pub use pipelines::{extract, extract_html};
pub use store::{MemoryStore, RecipeStore, StoredRecipe};

/// Fetch a page using the loaded configuration and extract its recipe.
pub async fn fetch_recipe(url: &str) -> Result<ExtractionResult, ImportError> {
    let config = config::ExtractorConfig::load()?;
    debug!("Using timeout of {}s", config.timeout);
    let fetcher = RequestFetcher::from_config(&config)?;
    Ok(pipelines::url::process(url, &fetcher).await?)
}

/// Fetch a page with an explicit timeout (default 10s) and extract its recipe.
pub async fn fetch_recipe_with_timeout(
    url: &str,
    timeout: Option<Duration>,
) -> Result<ExtractionResult, FetchError> {
    let fetcher = RequestFetcher::new(timeout)?;
    pipelines::url::process(url, &fetcher).await
}

/// Fetch, extract and persist a recipe for `user`.
///
/// Nothing is stored when the fetch fails.
pub async fn import_recipe<S>(
    store: &S,
    fetcher: &dyn Fetcher,
    user: &str,
    url: &str,
    tags: &[String],
) -> Result<StoredRecipe, ImportError>
where
    S: RecipeStore + ?Sized,
{
    let recipe = pipelines::url::process(url, fetcher).await?;
    Ok(store.upsert(user, url, &recipe, tags).await?)
}
