//! Sitemap reader
//!
//! Walks a sitemap index and its child sitemaps and collects every page URL.
//! Only the root sitemap is mandatory: a child sitemap that cannot be fetched
//! or parsed is logged and skipped.

use crate::crawler::fetcher::HttpClient;
use crate::url::normalize_url;
use crate::{HarvestError, Result, SitemapError, SitemapResult};
use futures::{stream, StreamExt};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use sxd_document::parser;
use url::Url;

/// Matches `<loc>` whether or not the sitemap namespace is declared
const LOC_XPATH: &str = "//*[local-name()='loc']";

/// Root element of a sitemap document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// `<sitemapindex>`: locations are child sitemaps
    Index,
    /// `<urlset>`: locations are pages
    Urlset,
}

/// Locations listed in one sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSitemap {
    pub kind: SitemapKind,
    pub locations: Vec<String>,
}

/// Parses a sitemap or sitemap index document
///
/// Locations are trimmed and returned in document order.
///
/// # Example
///
/// ```
/// use bilingual_harvest::crawler::{parse_sitemap, SitemapKind};
///
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///     <url><loc>https://example.org/en/a</loc></url>
/// </urlset>"#;
/// let parsed = parse_sitemap(xml).unwrap();
/// assert_eq!(parsed.kind, SitemapKind::Urlset);
/// assert_eq!(parsed.locations, vec!["https://example.org/en/a"]);
/// ```
pub fn parse_sitemap(xml: &str) -> SitemapResult<ParsedSitemap> {
    let package = parser::parse(xml).map_err(|e| SitemapError::InvalidXml(format!("{:?}", e)))?;
    let document = package.as_document();

    let root = document
        .root()
        .children()
        .into_iter()
        .find_map(|child| child.element())
        .ok_or(SitemapError::MissingRoot)?;

    let kind = match root.name().local_part() {
        "sitemapindex" => SitemapKind::Index,
        "urlset" => SitemapKind::Urlset,
        other => return Err(SitemapError::UnknownRoot(other.to_string())),
    };

    let factory = sxd_xpath::Factory::new();
    let xpath = factory
        .build(LOC_XPATH)
        .map_err(|e| SitemapError::XPath(format!("{:?}", e)))?
        .ok_or_else(|| SitemapError::XPath(LOC_XPATH.to_string()))?;

    let context = sxd_xpath::Context::new();
    let value = xpath
        .evaluate(&context, document.root())
        .map_err(|e| SitemapError::XPath(format!("{:?}", e)))?;

    let locations = match value {
        sxd_xpath::Value::Nodeset(nodes) => nodes
            .document_order()
            .into_iter()
            .map(|node| node.string_value().trim().to_string())
            .filter(|loc| !loc.is_empty())
            .collect(),
        _ => Vec::new(),
    };

    Ok(ParsedSitemap { kind, locations })
}

/// Reads every page URL reachable from a root sitemap
pub struct SitemapReader {
    client: Arc<HttpClient>,
    root_url: String,
    concurrency: usize,
}

impl SitemapReader {
    /// Creates a reader
    ///
    /// `concurrency` bounds how many child sitemaps are fetched at once.
    pub fn new(client: Arc<HttpClient>, root_url: impl Into<String>, concurrency: usize) -> Self {
        Self {
            client,
            root_url: root_url.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Lists all page URLs, deduplicated and sorted
    ///
    /// # Errors
    ///
    /// Fails only when the root sitemap cannot be fetched or parsed.
    pub async fn list_urls(&self) -> Result<Vec<Url>> {
        tracing::info!("Reading sitemap {}", self.root_url);
        let root = self.fetch_sitemap(&self.root_url).await?;

        let mut visited = HashSet::from([self.root_url.clone()]);
        let mut pages = BTreeSet::new();
        let mut pending = absorb(root, &mut visited, &mut pages);
        let mut sitemaps_read = 1usize;

        while !pending.is_empty() {
            tracing::info!("Fetching {} child sitemaps", pending.len());
            let batch = std::mem::take(&mut pending);

            let results: Vec<(String, Result<ParsedSitemap>)> = stream::iter(batch)
                .map(|url| async move {
                    let result = self.fetch_sitemap(&url).await;
                    (url, result)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

            for (url, result) in results {
                match result {
                    Ok(parsed) => {
                        sitemaps_read += 1;
                        let found = parsed.locations.len();
                        pending.extend(absorb(parsed, &mut visited, &mut pages));
                        tracing::debug!("Sitemap {} listed {} locations", url, found);
                    }
                    Err(e) => tracing::warn!("Skipping sitemap {}: {}", url, e),
                }
            }
        }

        tracing::info!(
            "Found {} unique page URLs in {} sitemaps",
            pages.len(),
            sitemaps_read
        );

        Ok(pages.into_iter().collect())
    }

    async fn fetch_sitemap(&self, url: &str) -> Result<ParsedSitemap> {
        let page = self.client.fetch(url).await?;
        parse_sitemap(&page.body).map_err(|source| HarvestError::Sitemap {
            url: url.to_string(),
            source,
        })
    }
}

/// Merges one parsed sitemap into the run state
///
/// Page locations go into `pages`; child sitemaps not seen before are
/// returned for fetching.
fn absorb(
    parsed: ParsedSitemap,
    visited: &mut HashSet<String>,
    pages: &mut BTreeSet<Url>,
) -> Vec<String> {
    match parsed.kind {
        SitemapKind::Index => parsed
            .locations
            .into_iter()
            .filter(|loc| visited.insert(loc.clone()))
            .collect(),
        SitemapKind::Urlset => {
            for loc in parsed.locations {
                match normalize_url(&loc) {
                    Ok(url) => {
                        pages.insert(url);
                    }
                    Err(e) => tracing::debug!("Ignoring sitemap entry {}: {}", loc, e),
                }
            }
            Vec::new()
        }
    }
}
