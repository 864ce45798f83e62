//! Page fetcher: HTTP fetch plus content extraction for a single page

use crate::crawler::fetcher::HttpClient;
use crate::crawler::parser::ContentExtractor;
use crate::{HarvestError, Result};
use std::sync::Arc;
use url::Url;

/// Cleaned text of one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub url: Url,
    pub raw_text: String,
}

/// Fetches pages and extracts their main text
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Arc<HttpClient>,
    extractor: Arc<ContentExtractor>,
}

impl PageFetcher {
    pub fn new(client: Arc<HttpClient>, extractor: Arc<ContentExtractor>) -> Self {
        Self { client, extractor }
    }

    /// Fetches `url` and extracts its content region
    ///
    /// Failures are final for this run: the client has already retried
    /// transient errors, and a page without a content region stays that way.
    pub async fn fetch_content(&self, url: &Url) -> Result<ExtractedPage> {
        let page = self.client.fetch(url.as_str()).await?;

        match self.extractor.extract(&page.body) {
            Some(raw_text) => Ok(ExtractedPage {
                url: url.clone(),
                raw_text,
            }),
            None => Err(HarvestError::NoContent {
                url: url.to_string(),
            }),
        }
    }

    /// Returns true when pages are split into article blocks
    pub fn splits_articles(&self) -> bool {
        self.extractor.splits_articles()
    }

    /// Fetches `url` and extracts every article block in document order
    ///
    /// Empty blocks are kept so positions line up across languages. A page
    /// with no block at all is `NoContent`.
    pub async fn fetch_articles(&self, url: &Url) -> Result<Vec<ExtractedPage>> {
        let page = self.client.fetch(url.as_str()).await?;
        let articles = self.extractor.extract_articles(&page.body);

        if articles.is_empty() {
            return Err(HarvestError::NoContent {
                url: url.to_string(),
            });
        }

        Ok(articles
            .into_iter()
            .map(|raw_text| ExtractedPage {
                url: url.clone(),
                raw_text,
            })
            .collect())
    }

    /// Fetches `url` and returns the counterpart named by its language switch link
    pub async fn fetch_language_link(&self, url: &Url) -> Result<Option<Url>> {
        let page = self.client.fetch(url.as_str()).await?;
        let base = Url::parse(&page.final_url).unwrap_or_else(|_| url.clone());
        Ok(self.extractor.find_language_link(&page.body, &base))
    }
}
