//! Run statistics
//!
//! Counters are aggregated by the coordinator as pair outcomes arrive and
//! printed once the run ends. In article mode the outcome counters count
//! article pairs, so they can add up to more than `pairs_total`.

use crate::state::PairOutcome;
use std::collections::HashMap;
use std::time::Duration;

/// Harvest run summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestStats {
    /// Unique page URLs found in the sitemaps
    pub urls_discovered: u64,

    /// Candidate pairs handed to the workers
    pub pairs_total: u64,

    /// Pairs that produced a record
    pub accepted: u64,

    /// Pairs dropped because a page could not be fetched
    pub fetch_failed: u64,

    /// Pairs dropped because a page had no content region
    pub no_content: u64,

    /// Pairs dropped by the quality checker, keyed by rule label
    pub rejected: HashMap<&'static str, u64>,

    /// Lines written to the output file
    pub records_written: u64,

    /// Wall time spent processing pairs
    pub elapsed: Duration,
}

impl HarvestStats {
    /// Counts one finished pair
    pub fn record(&mut self, outcome: &PairOutcome) {
        match outcome {
            PairOutcome::Accepted => self.accepted += 1,
            PairOutcome::FetchFailed { .. } => self.fetch_failed += 1,
            PairOutcome::NoContent { .. } => self.no_content += 1,
            PairOutcome::Rejected(rejection) => {
                *self.rejected.entry(rejection.label()).or_insert(0) += 1;
            }
        }
    }

    /// Total pairs dropped by quality rules
    pub fn rejected_total(&self) -> u64 {
        self.rejected.values().sum()
    }

    /// Pairs that reached a final outcome
    pub fn finished(&self) -> u64 {
        self.accepted + self.fetch_failed + self.no_content + self.rejected_total()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStats) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Page URLs discovered: {}", stats.urls_discovered);
    println!("  Candidate pairs: {}", stats.pairs_total);
    println!("  Records written: {}", stats.records_written);
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    println!("Pairs by Outcome:");
    let outcomes = [
        ("accepted", stats.accepted),
        ("fetch_failed", stats.fetch_failed),
        ("no_content", stats.no_content),
        ("rejected", stats.rejected_total()),
    ];
    for (label, count) in outcomes {
        println!("  {}: {} ({:.1}%)", label, count, percentage(count, stats.finished()));
    }
    println!();

    if !stats.rejected.is_empty() {
        println!("Rejections by Rule:");
        // Sort rules by count (descending)
        let mut rules: Vec<_> = stats.rejected.iter().collect();
        rules.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

        for (rule, count) in rules {
            println!("  {}: {}", rule, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} accepted)",
        percentage(stats.accepted, stats.finished()),
        stats.accepted,
        stats.finished()
    );
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        (part as f64 / whole as f64) * 100.0
    } else {
        0.0
    }
}
