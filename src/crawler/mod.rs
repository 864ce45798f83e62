//! Crawler module for sitemap reading and pair harvesting
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching with request delay and retry logic
//! - Sitemap index traversal
//! - HTML content extraction and language link discovery
//! - Concurrent pair coordination

mod coordinator;
mod discovery;
mod fetcher;
mod page;
mod parser;
mod sitemap;

pub use coordinator::Coordinator;
pub use discovery::discover_pairs_by_link;
pub use fetcher::{build_http_client, FetchedPage, HttpClient, RetryPolicy};
pub use page::{ExtractedPage, PageFetcher};
pub use parser::ContentExtractor;
pub use sitemap::{parse_sitemap, ParsedSitemap, SitemapKind, SitemapReader};

use crate::config::{Config, PairingMode};
use crate::output::{HarvestStats, JsonlWriter};
use crate::url::{derive_pairs, LanguageMarkers, PageCandidatePair};
use crate::Result;
use std::sync::Arc;
use url::Url;

/// Page URLs and candidate pairs for one run
#[derive(Debug, Clone, Default)]
pub struct HarvestPlan {
    pub urls: Vec<Url>,
    pub pairs: Vec<PageCandidatePair>,
}

/// Reads the sitemap and derives the candidate pairs
///
/// # Errors
///
/// Fails when the root sitemap cannot be read.
pub async fn plan(config: &Config, client: Arc<HttpClient>) -> Result<HarvestPlan> {
    let reader = SitemapReader::new(
        Arc::clone(&client),
        config.sitemap.root_url.clone(),
        config.scraper.workers,
    );
    let urls = reader.list_urls().await?;

    let pairs = match config.pairing.mode {
        PairingMode::PathSegment => derive_pairs(&urls, &LanguageMarkers::from(&config.pairing)),
        PairingMode::LanguageLink => {
            let extractor = ContentExtractor::new(&config.extraction, &config.pairing)?;
            let pages = PageFetcher::new(client, Arc::new(extractor));
            discover_pairs_by_link(&pages, &urls, config.scraper.workers).await
        }
    };

    tracing::info!(
        "{} candidate pairs from {} page URLs",
        pairs.len(),
        urls.len()
    );

    Ok(HarvestPlan { urls, pairs })
}

/// Runs a complete harvest
///
/// This is the main entry point. It will:
/// 1. Read the sitemap and derive candidate pairs
/// 2. Open the output file
/// 3. Fetch, check and write every pair
///
/// The output file is only opened once the sitemap has been read, so a
/// fatal sitemap failure leaves no output behind.
pub async fn harvest(config: &Config) -> Result<HarvestStats> {
    let client = Arc::new(HttpClient::new(config)?);
    let coordinator = Coordinator::new(config, Arc::clone(&client))?;

    let planned = plan(config, client).await?;

    let writer = Arc::new(JsonlWriter::create(&config.output).await?);
    let mut stats = coordinator.run_into(planned.pairs, writer).await?;
    stats.urls_discovered = planned.urls.len() as u64;

    Ok(stats)
}
