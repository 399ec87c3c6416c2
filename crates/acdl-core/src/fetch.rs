//! Page fetch with bounded retry.

use std::collections::HashMap;

use crate::config::AcdlConfig;
use crate::http::{referer_headers, HttpError, Transport};
use crate::retry::{run_with_retry, RetryPolicy};

/// Raw bytes of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent(pub Vec<u8>);

impl PageContent {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Every attempt to fetch a page failed.
#[derive(Debug, thiserror::Error)]
#[error("Max retries (= {attempts}) reached, giving up on URL: {url} (last error: {source})")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    #[source]
    pub source: HttpError,
}

/// Fetches page markup, retrying any transport or status failure.
pub struct PageFetcher<'a> {
    transport: &'a dyn Transport,
    headers: HashMap<String, String>,
    policy: RetryPolicy,
}

impl<'a> PageFetcher<'a> {
    pub fn new(transport: &'a dyn Transport, referer: &str, policy: RetryPolicy) -> Self {
        Self {
            transport,
            headers: referer_headers(referer),
            policy,
        }
    }

    pub fn from_config(transport: &'a dyn Transport, cfg: &AcdlConfig) -> Self {
        Self::new(transport, &cfg.referer, RetryPolicy::from_config(cfg))
    }

    pub fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        let what = format!("GET {}", url);
        let body = run_with_retry(&self.policy, &what, |_| {
            self.transport.get(url, &self.headers)
        })
        .map_err(|e| FetchError {
            url: url.to_string(),
            attempts: e.attempts,
            source: e.last,
        })?;
        tracing::debug!(url, bytes = body.len(), "fetched page");
        Ok(PageContent(body))
    }
}
