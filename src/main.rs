use std::env;

use cocinando_extract::config::ExtractorConfig;
use cocinando_extract::fetchers::RequestFetcher;
use cocinando_extract::pipelines;
use log::error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Get the URL from command-line arguments
    let args: Vec<String> = env::args().collect();
    let url = args
        .get(1)
        .ok_or("Usage: cocinando-extract <url>")?;

    let config = ExtractorConfig::load()?;
    let fetcher = RequestFetcher::from_config(&config)?;

    match pipelines::url::process(url, &fetcher).await {
        Ok(recipe) => {
            println!("{}", serde_json::to_string_pretty(&recipe)?);
            Ok(())
        }
        Err(e) => {
            error!("Extraction failed: {e}");
            Err(e.into())
        }
    }
}
