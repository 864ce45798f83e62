//! Pair discovery through on-page language switch links
//!
//! Used instead of path-segment derivation for sites whose Welsh URLs are
//! translated rather than prefixed. Every sitemap page is fetched once and
//! its "Cymraeg" link, when present, names the Welsh counterpart.

use crate::crawler::page::PageFetcher;
use crate::url::{normalize_url, PageCandidatePair};
use futures::{stream, StreamExt};
use std::collections::BTreeSet;
use url::Url;

/// Discovers English/Welsh pairs by following language switch links
///
/// Pages that cannot be fetched or carry no switch link are skipped. A link
/// pointing back at the page itself is ignored. The result is deduplicated
/// and sorted.
pub async fn discover_pairs_by_link(
    pages: &PageFetcher,
    urls: &[Url],
    workers: usize,
) -> Vec<PageCandidatePair> {
    tracing::info!("Discovering language links on {} pages", urls.len());

    let found: Vec<Option<PageCandidatePair>> = stream::iter(urls)
        .map(|url| async move {
            match pages.fetch_language_link(url).await {
                Ok(Some(link)) => match normalize_url(link.as_str()) {
                    Ok(welsh) if welsh != *url => Some(PageCandidatePair::new(url.clone(), welsh)),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::debug!("Ignoring language link {} on {}: {}", link, url, e);
                        None
                    }
                },
                Ok(None) => {
                    tracing::trace!("No language link on {}", url);
                    None
                }
                Err(e) => {
                    tracing::warn!("Skipping {} during link discovery: {}", url, e);
                    None
                }
            }
        })
        .buffer_unordered(workers.max(1))
        .collect()
        .await;

    let pairs: BTreeSet<PageCandidatePair> = found.into_iter().flatten().collect();
    tracing::info!("Discovered {} pairs through language links", pairs.len());

    pairs.into_iter().collect()
}
