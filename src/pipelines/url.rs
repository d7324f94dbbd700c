use log::info;

use crate::error::FetchError;
use crate::fetchers::Fetcher;
use crate::model::ExtractionResult;
use crate::pipelines::document::extract_html;

/// Process a URL to extract a recipe record
///
/// This pipeline:
/// 1. Fetches the page with the given fetcher (no retries)
/// 2. Parses the HTML
/// 3. Runs structured data, then the per-field heuristic chains
///
/// # Arguments
/// * `url` - The URL to fetch and process
/// * `fetcher` - Fetch collaborator, usually a `RequestFetcher`
///
/// # Returns
/// * `Ok(ExtractionResult)` - Best-effort record; any field may be empty
/// * `Err(FetchError)` - If the page could not be fetched
pub async fn process<F>(url: &str, fetcher: &F) -> Result<ExtractionResult, FetchError>
where
    F: Fetcher + ?Sized,
{
    let html = fetcher.fetch(url).await?;
    let result = extract_html(&html);

    info!(
        "Extracted {url}: title={}, {} ingredients, {} steps, image={}, {} links",
        result.title.is_some(),
        result.ingredients.len(),
        result.steps.len(),
        result.image.is_some(),
        result.links.len()
    );

    Ok(result)
}
