//! Error types for the query-sync controller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while constructing controllers or loading configuration.
///
/// Runtime failures never surface through this type: a failed fetch is
/// rendered into the results panel and navigation has no failure path.
#[derive(Error, Debug)]
pub enum QsyncError {
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failure of a single in-page search request.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search endpoint returned status {0}")]
    Status(u16),

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("search endpoint unavailable: {0}")]
    Unavailable(String),
}

/// Parse a URL, keeping the offending input in the error.
pub fn parse_url(input: &str) -> Result<url::Url, QsyncError> {
    url::Url::parse(input).map_err(|source| QsyncError::InvalidUrl {
        url: input.to_string(),
        source,
    })
}
