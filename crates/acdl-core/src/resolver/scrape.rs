//! HTML scraping via `scraper`: first element matching a CSS selector, one attribute.

use scraper::{Html, Selector};

use super::{LinkExtractor, ResolveError};

/// Reads `attribute` from the first element matching `selector`.
#[derive(Debug, Clone)]
pub struct ScraperExtractor {
    selector: Selector,
    selector_src: String,
    attribute: String,
}

impl ScraperExtractor {
    pub fn new(selector: &str, attribute: &str) -> Result<Self, ResolveError> {
        let parsed = Selector::parse(selector).map_err(|e| ResolveError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            selector: parsed,
            selector_src: selector.to_string(),
            attribute: attribute.to_string(),
        })
    }
}

impl LinkExtractor for ScraperExtractor {
    fn extract_link(&self, page: &[u8]) -> Result<String, ResolveError> {
        let markup = String::from_utf8_lossy(page);
        let document = Html::parse_document(&markup);
        let element = document
            .select(&self.selector)
            .next()
            .ok_or_else(|| ResolveError::MissingElement {
                selector: self.selector_src.clone(),
            })?;
        element
            .value()
            .attr(&self.attribute)
            .map(str::to_string)
            .ok_or_else(|| ResolveError::MissingAttribute {
                selector: self.selector_src.clone(),
                attribute: self.attribute.clone(),
            })
    }
}
