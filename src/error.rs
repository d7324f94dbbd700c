use thiserror::Error;

/// Errors raised while fetching a recipe page
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    /// Connection, TLS, redirect or body decoding failure
    #[error("Failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("Fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

/// Errors raised by a recipe store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The user identifier was empty
    #[error("User identifier must not be empty")]
    MissingUser,

    /// The source URL could not be parsed
    #[error("Invalid source URL {url}: {source}")]
    InvalidSourceUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that can occur during a full import (config, fetch, store)
#[derive(Error, Debug)]
pub enum ImportError {
    /// Failed to fetch the recipe page
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Failed to persist the extraction result
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
