//! Bilingual-Harvest main entry point
//!
//! This is the command-line interface for the English/Welsh page pair harvester.

use anyhow::Context;
use bilingual_harvest::config::{load_effective_config, Config, PairingMode};
use bilingual_harvest::crawler::{harvest, plan, HttpClient};
use bilingual_harvest::output::print_statistics;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Bilingual-Harvest: an English/Welsh parallel text harvester
///
/// Reads a site's sitemap, pairs English pages with their Welsh
/// counterparts, extracts the main text of both and writes the pairs that
/// look like genuine translations as JSON lines.
///
/// Settings come from the optional TOML file, then from HARVEST_*
/// environment variables.
#[derive(Parser, Debug)]
#[command(name = "bilingual-harvest")]
#[command(version)]
#[command(about = "An English/Welsh parallel text harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config, read the sitemap and show the candidate pairs without fetching pages
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_effective_config(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match (&cli.config, config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("Using default configuration"),
    }

    if cli.dry_run {
        handle_dry_run(&config).await
    } else {
        handle_harvest(&config, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bilingual_harvest=info,warn"),
            1 => EnvFilter::new("bilingual_harvest=debug,info"),
            2 => EnvFilter::new("bilingual_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the configuration and the planned pairs
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Bilingual-Harvest Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Workers: {}", config.scraper.workers);
    println!("  Request delay: {}ms", config.scraper.request_delay_ms);
    println!(
        "  Retries: {} (backoff {}ms..{}ms)",
        config.scraper.max_retries, config.scraper.backoff_base_ms, config.scraper.backoff_max_ms
    );
    println!("  Timeout: {}s", config.scraper.timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nPairing:");
    match config.pairing.mode {
        PairingMode::PathSegment => println!(
            "  Path segments: /{}/ <-> /{}/",
            config.pairing.english_segment, config.pairing.welsh_segment
        ),
        PairingMode::LanguageLink => println!(
            "  Language link: {} labelled \"{}\"",
            config.pairing.language_link_selector, config.pairing.language_link_text
        ),
    }

    println!("\nOutput:");
    println!("  File: {}", config.output.path().display());
    println!(
        "  Mode: {}",
        if config.output.append { "append" } else { "truncate" }
    );

    println!("\nSitemap: {}", config.sitemap.root_url);

    let client = Arc::new(HttpClient::new(config).context("Failed to build HTTP client")?);
    let planned = plan(config, client)
        .await
        .context("Failed to read sitemap")?;

    println!("\n✓ Configuration is valid");
    println!("✓ {} page URLs in sitemap", planned.urls.len());
    println!("✓ Would process {} candidate pairs", planned.pairs.len());

    for pair in planned.pairs.iter().take(10) {
        println!("  - {} <-> {}", pair.english_url, pair.welsh_url);
    }
    if planned.pairs.len() > 10 {
        println!("  ... and {} more", planned.pairs.len() - 10);
    }

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Starting harvest of {} with {} workers",
        config.sitemap.root_url,
        config.scraper.workers
    );

    let stats = match harvest(config).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e).context("Harvest aborted");
        }
    };

    tracing::info!(
        "Harvest complete: {} records written to {}",
        stats.records_written,
        config.output.path().display()
    );

    if !quiet {
        println!();
        print_statistics(&stats);
    }

    Ok(())
}
