//! HTTP search client for the `/search/ajax/` endpoint.

use crate::error::{parse_url, FetchError, QsyncError};
use crate::surface::SearchClient;
use crate::types::SearchResponse;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SEARCH_PATH: &str = "/search/ajax/";
const QUERY_KEY: &str = "q";

/// Issues `GET <endpoint>?q=<query>` and decodes the JSON body.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpSearchClient {
    pub fn new(endpoint: Url) -> Result<Self, QsyncError> {
        Self::with_timeout(endpoint, Duration::from_secs(10))
    }

    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, QsyncError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    /// Resolve `path` against a site root, e.g. `https://shop.test` + `/search/ajax/`
    pub fn for_site(base: &str, path: &str) -> Result<Self, QsyncError> {
        let base = parse_url(base)?;
        let endpoint = base.join(path).map_err(|source| QsyncError::InvalidUrl {
            url: path.to_string(),
            source,
        })?;
        Self::new(endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Request URL for `query`, with the query percent-encoded
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(QUERY_KEY, query);
        url
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, FetchError> {
        let url = self.request_url(query);
        log::debug!("Search request: {}", url);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let decoded: SearchResponse = serde_json::from_slice(&body)?;
        log::trace!(
            "Search response for {:?}: {} results",
            decoded.query,
            decoded.results.len()
        );
        Ok(decoded)
    }
}
