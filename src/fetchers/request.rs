use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;

use super::Fetcher;
use crate::config::{ExtractorConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::error::FetchError;

/// Plain HTTP fetcher with a desktop browser user agent and a hard timeout.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        Self::with_user_agent(
            timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            DEFAULT_USER_AGENT,
        )
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self, FetchError> {
        Self::with_user_agent(config.timeout(), &config.user_agent)
    }

    fn with_user_agent(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("Fetching {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        debug!("Fetched {} bytes from {url}", html.len());
        Ok(html)
    }
}
