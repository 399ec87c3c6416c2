//! Download link resolution: page markup → direct file URL.
//!
//! The visible download anchor on a document page is not itself a file
//! resource. Its href carries an opaque identifier (second-to-last path
//! segment) that is recombined with the download service base URL.
//!
//! Markup parsing sits behind [`LinkExtractor`] so the pipeline does not
//! depend on the HTML library.

mod scrape;

pub use scrape::ScraperExtractor;

use crate::config::AcdlConfig;
use crate::fetch::PageContent;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("no element matching {selector:?} on page")]
    MissingElement { selector: String },
    #[error("element {selector:?} has no {attribute:?} attribute")]
    MissingAttribute { selector: String, attribute: String },
    #[error("download link {href:?} carries no identifier")]
    MissingIdentifier { href: String },
}

/// Extracts the raw download link from page bytes.
pub trait LinkExtractor: Send + Sync {
    fn extract_link(&self, page: &[u8]) -> Result<String, ResolveError>;
}

/// Direct download URL derived from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget(pub String);

impl DownloadTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Second-to-last `/`-delimited segment of `href`.
///
/// `https://host/attachments/123456/download_file?x` → `123456`.
pub fn download_identifier(href: &str) -> Option<&str> {
    let mut segments = href.rsplit('/');
    segments.next()?;
    let id = segments.next()?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

pub struct DownloadLinkResolver {
    extractor: Box<dyn LinkExtractor>,
    download_base: String,
}

impl DownloadLinkResolver {
    pub fn new(extractor: Box<dyn LinkExtractor>, download_base: &str) -> Self {
        Self {
            extractor,
            download_base: download_base.trim_end_matches('/').to_string(),
        }
    }

    /// Resolver using the configured selector, attribute and download base.
    pub fn from_config(cfg: &AcdlConfig) -> Result<Self, ResolveError> {
        let extractor = ScraperExtractor::new(&cfg.anchor_selector, &cfg.link_attribute)?;
        Ok(Self::new(Box::new(extractor), &cfg.download_base))
    }

    /// Identifier carried by the page's download link.
    fn identifier(&self, page: &PageContent) -> Result<String, ResolveError> {
        let href = self.extractor.extract_link(page.as_bytes())?;
        download_identifier(&href)
            .map(str::to_string)
            .ok_or(ResolveError::MissingIdentifier { href })
    }

    pub fn resolve(&self, page: &PageContent) -> Result<DownloadTarget, ResolveError> {
        let id = self.identifier(page)?;
        let target = DownloadTarget(format!("{}/{}", self.download_base, id));
        tracing::debug!(target = target.as_str(), "resolved download link");
        Ok(target)
    }
}
