//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building HTTP clients with proper user agent strings
//! - A fixed politeness delay before every request
//! - Retry with exponential backoff for transient failures
//! - Error classification

use crate::config::{Config, ScraperConfig, UserAgentConfig};
use crate::{HarvestError, Result};
use reqwest::Client;
use std::time::Duration;

/// A successfully fetched response body
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The requested URL
    pub url: String,
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use bilingual_harvest::config::UserAgentConfig;
/// use bilingual_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Bounded exponential backoff
///
/// Retry `n` (0-indexed) waits `min(base * 2^n, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Cap for any single delay
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.backoff_base_ms),
            max_delay: Duration::from_millis(config.backoff_max_ms),
        }
    }

    /// Returns the delay to wait before retry number `retry` (0-indexed)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.min(16);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// HTTP client shared by every fetcher in a run
///
/// Wraps a `reqwest::Client` with the request delay and retry policy.
/// Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
    request_delay: Duration,
}

impl HttpClient {
    /// Builds the client from the run configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.scraper.timeout_secs),
        )?;

        Ok(Self::with_client(
            client,
            RetryPolicy::from_config(&config.scraper),
            Duration::from_millis(config.scraper.request_delay_ms),
        ))
    }

    pub fn with_client(client: Client, retry: RetryPolicy, request_delay: Duration) -> Self {
        Self {
            client,
            retry,
            request_delay,
        }
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Return body |
    /// | HTTP 5xx, 408, 429 | Retry with backoff |
    /// | Timeout, connection error | Retry with backoff |
    /// | Other HTTP status | Fail immediately |
    ///
    /// The request delay is slept before every attempt. After
    /// `max_retries` retries the last error is returned.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let mut retry = 0;

        loop {
            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            match self.fetch_once(url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && retry < self.retry.max_retries => {
                    let delay = self.retry.delay_for(retry);
                    retry += 1;
                    tracing::debug!(
                        "Retry {}/{} for {} in {:?}: {}",
                        retry,
                        self.retry.max_retries,
                        url,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if retry > 0 {
                        tracing::debug!("Giving up on {} after {} retries", url, retry);
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Sends a single GET request and classifies the result
    async fn fetch_once(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

fn classify_request_error(url: &str, error: reqwest::Error) -> HarvestError {
    if error.is_timeout() {
        HarvestError::Timeout {
            url: url.to_string(),
        }
    } else {
        HarvestError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
