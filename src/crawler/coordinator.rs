//! Harvest coordinator - concurrent pair processing
//!
//! This module runs the page fetcher and quality checker over every
//! candidate pair with a bounded pool of tokio tasks:
//! - At most `workers` pairs are in flight; the rest wait in the queue
//! - A worker fetches the English page, then the Welsh page, so at most
//!   `workers` page requests are open at once
//! - Accepted pairs become records, written by the worker that produced them
//! - Outcomes are counted here as tasks finish
//!
//! With an article selector configured, each page yields a list of article
//! blocks; the English and Welsh lists are paired by position and every
//! article pair is checked and counted on its own.
//!
//! Page failures and rejections drop the pair. A write failure or a panicked
//! worker aborts the run; in-flight tasks are cancelled with the `JoinSet`.

use crate::config::Config;
use crate::crawler::fetcher::HttpClient;
use crate::crawler::page::{ExtractedPage, PageFetcher};
use crate::crawler::parser::ContentExtractor;
use crate::output::{BilingualRecord, HarvestStats, JsonlWriter};
use crate::quality::QualityChecker;
use crate::state::PairOutcome;
use crate::url::{Language, PageCandidatePair};
use crate::{HarvestError, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Result of one worker task
///
/// Holds one outcome per checked text pair: a single one for whole pages,
/// one per article pair in article mode.
struct Finished {
    pair: PageCandidatePair,
    outcomes: Vec<PairOutcome>,
    records: Vec<BilingualRecord>,
}

/// Page that failed, with its language
type Dropped = (Language, HarvestError);

/// Main harvest coordinator structure
#[derive(Debug, Clone)]
pub struct Coordinator {
    pages: Arc<PageFetcher>,
    checker: Arc<QualityChecker>,
    workers: usize,
}

impl Coordinator {
    /// Creates a coordinator sharing `client` with the rest of the run
    ///
    /// # Errors
    ///
    /// Fails when a configured selector does not compile.
    pub fn new(config: &Config, client: Arc<HttpClient>) -> Result<Self> {
        let extractor = ContentExtractor::new(&config.extraction, &config.pairing)?;

        Ok(Self::from_parts(
            PageFetcher::new(client, Arc::new(extractor)),
            QualityChecker::new(config.quality.clone()),
            config.scraper.workers,
        ))
    }

    pub fn from_parts(pages: PageFetcher, checker: QualityChecker, workers: usize) -> Self {
        Self {
            pages: Arc::new(pages),
            checker: Arc::new(checker),
            workers: workers.max(1),
        }
    }

    /// Processes every pair and returns the accepted records
    ///
    /// Records come back in completion order.
    pub async fn run(&self, pairs: Vec<PageCandidatePair>) -> Result<Vec<BilingualRecord>> {
        let (_, records) = self.execute(pairs, None).await?;
        Ok(records)
    }

    /// Processes every pair, appending accepted records to `writer`
    ///
    /// Returns the run statistics. `urls_discovered` is left for the caller.
    pub async fn run_into(
        &self,
        pairs: Vec<PageCandidatePair>,
        writer: Arc<JsonlWriter>,
    ) -> Result<HarvestStats> {
        let (stats, _) = self.execute(pairs, Some(writer)).await?;
        Ok(stats)
    }

    async fn execute(
        &self,
        pairs: Vec<PageCandidatePair>,
        writer: Option<Arc<JsonlWriter>>,
    ) -> Result<(HarvestStats, Vec<BilingualRecord>)> {
        let total = pairs.len();
        tracing::info!(
            "Processing {} candidate pairs with {} workers",
            total,
            self.workers
        );

        let mut stats = HarvestStats {
            pairs_total: total as u64,
            ..HarvestStats::default()
        };
        let mut records = Vec::new();

        let start_time = Instant::now();
        let mut completed = 0usize;
        let mut queue = pairs.into_iter();
        let mut tasks = JoinSet::new();

        loop {
            while tasks.len() < self.workers {
                let Some(pair) = queue.next() else {
                    break;
                };
                tasks.spawn(process_pair(
                    Arc::clone(&self.pages),
                    Arc::clone(&self.checker),
                    pair,
                    writer.clone(),
                ));
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };
            let finished = joined??;

            for outcome in &finished.outcomes {
                match outcome {
                    PairOutcome::Accepted => {
                        tracing::debug!("Accepted {}", finished.pair.english_url);
                    }
                    PairOutcome::Rejected(_) => {
                        tracing::debug!("Dropped {}: {}", finished.pair.english_url, outcome);
                    }
                    _ => {
                        tracing::warn!("Dropped {}: {}", finished.pair.english_url, outcome);
                    }
                }

                stats.record(outcome);
                if outcome.is_success() && writer.is_some() {
                    stats.records_written += 1;
                }
            }
            records.extend(finished.records);

            completed += 1;
            if completed % 10 == 0 {
                let rate = completed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {}/{} pairs, {} accepted, {:.2} pairs/sec",
                    completed,
                    total,
                    stats.accepted,
                    rate
                );
            }
        }

        stats.elapsed = start_time.elapsed();
        tracing::info!(
            "Processed {} pairs in {:.1}s: {} accepted, {} rejected, {} failed",
            completed,
            stats.elapsed.as_secs_f64(),
            stats.accepted,
            stats.rejected_total(),
            stats.fetch_failed + stats.no_content
        );

        Ok((stats, records))
    }
}

/// Fetches both pages of a pair, checks them and emits the records
///
/// With a writer the records are appended here and not returned.
async fn process_pair(
    pages: Arc<PageFetcher>,
    checker: Arc<QualityChecker>,
    pair: PageCandidatePair,
    writer: Option<Arc<JsonlWriter>>,
) -> Result<Finished> {
    let texts = if pages.splits_articles() {
        fetch_articles(&pages, &pair).await
    } else {
        fetch_pages(&pages, &pair).await.map(|texts| vec![texts])
    };

    let texts = match texts {
        Ok(texts) => texts,
        Err((language, e)) => return Ok(dropped(pair, language, e)),
    };

    let mut finished = Finished {
        pair,
        outcomes: Vec::with_capacity(texts.len()),
        records: Vec::new(),
    };

    for (english, welsh) in texts {
        if let Err(rejection) = checker.evaluate(&english.raw_text, &welsh.raw_text) {
            finished.outcomes.push(PairOutcome::Rejected(rejection));
            continue;
        }

        let record = into_record(english, welsh);
        match &writer {
            Some(writer) => writer.append(&record).await?,
            None => finished.records.push(record),
        }
        finished.outcomes.push(PairOutcome::Accepted);
    }

    Ok(finished)
}

/// Fetches the English page, then the Welsh page
async fn fetch_pages(
    pages: &PageFetcher,
    pair: &PageCandidatePair,
) -> std::result::Result<(ExtractedPage, ExtractedPage), Dropped> {
    let english = pages
        .fetch_content(&pair.english_url)
        .await
        .map_err(|e| (Language::English, e))?;
    let welsh = pages
        .fetch_content(&pair.welsh_url)
        .await
        .map_err(|e| (Language::Welsh, e))?;

    Ok((english, welsh))
}

/// Fetches the article blocks of both pages and pairs them by position
///
/// Surplus articles on the longer side are dropped.
async fn fetch_articles(
    pages: &PageFetcher,
    pair: &PageCandidatePair,
) -> std::result::Result<Vec<(ExtractedPage, ExtractedPage)>, Dropped> {
    let english = pages
        .fetch_articles(&pair.english_url)
        .await
        .map_err(|e| (Language::English, e))?;
    let welsh = pages
        .fetch_articles(&pair.welsh_url)
        .await
        .map_err(|e| (Language::Welsh, e))?;

    if english.len() != welsh.len() {
        tracing::debug!(
            "Article count differs for {} ({} en, {} cy), pairing the first {}",
            pair.english_url,
            english.len(),
            welsh.len(),
            english.len().min(welsh.len())
        );
    }

    Ok(english.into_iter().zip(welsh).collect())
}

fn into_record(english: ExtractedPage, welsh: ExtractedPage) -> BilingualRecord {
    BilingualRecord {
        url: english.url.to_string(),
        en: english.raw_text,
        cy: welsh.raw_text,
    }
}

fn dropped(pair: PageCandidatePair, language: Language, error: HarvestError) -> Finished {
    let outcome = match error {
        HarvestError::NoContent { .. } => PairOutcome::NoContent { language },
        other => PairOutcome::FetchFailed {
            language,
            error: other.to_string(),
        },
    };

    Finished {
        pair,
        outcomes: vec![outcome],
        records: Vec::new(),
    }
}
