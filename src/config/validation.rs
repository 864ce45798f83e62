use crate::config::types::{
    Config, ExtractionConfig, OutputConfig, PairingConfig, QualityConfig, ScraperConfig,
    SitemapConfig, UserAgentConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_sitemap_config(&config.sitemap)?;
    validate_pairing_config(&config.pairing)?;
    validate_extraction_config(&config.extraction)?;
    validate_quality_config(&config.quality)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates worker pool and pacing configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.backoff_max_ms < config.backoff_base_ms {
        return Err(ConfigError::Validation(format!(
            "backoff_max_ms ({}) must be >= backoff_base_ms ({})",
            config.backoff_max_ms, config.backoff_base_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the sitemap location
fn validate_sitemap_config(config: &SitemapConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.root_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid sitemap URL '{}': {}", config.root_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Sitemap URL '{}' must use HTTP or HTTPS",
            config.root_url
        )));
    }

    Ok(())
}

/// Validates the language markers and the language link selector
fn validate_pairing_config(config: &PairingConfig) -> Result<(), ConfigError> {
    for (name, segment) in [
        ("english_segment", &config.english_segment),
        ("welsh_segment", &config.welsh_segment),
    ] {
        if segment.is_empty() || segment.contains('/') {
            return Err(ConfigError::Validation(format!(
                "{} must be a single non-empty path segment, got '{}'",
                name, segment
            )));
        }
    }

    if config.english_segment == config.welsh_segment {
        return Err(ConfigError::Validation(format!(
            "english_segment and welsh_segment must differ, both are '{}'",
            config.english_segment
        )));
    }

    validate_selector(&config.language_link_selector)?;

    Ok(())
}

/// Validates that all extraction selectors compile
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.content_selectors.is_empty() {
        return Err(ConfigError::Validation(
            "content_selectors cannot be empty".to_string(),
        ));
    }

    for selector in config
        .content_selectors
        .iter()
        .chain(&config.boilerplate_selectors)
        .chain(&config.article_selector)
    {
        validate_selector(selector)?;
    }

    Ok(())
}

/// Validates the quality thresholds
fn validate_quality_config(config: &QualityConfig) -> Result<(), ConfigError> {
    if config.min_length < 1 {
        return Err(ConfigError::Validation(
            "min_length must be >= 1".to_string(),
        ));
    }

    if !(config.min_length_ratio > 0.0 && config.min_length_ratio <= config.max_length_ratio) {
        return Err(ConfigError::Validation(format!(
            "length ratio band must satisfy 0 < min <= max, got [{}, {}]",
            config.min_length_ratio, config.max_length_ratio
        )));
    }

    for (name, ratio) in [
        ("min_welsh_ratio", config.min_welsh_ratio),
        ("min_english_ratio", config.min_english_ratio),
    ] {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::Validation(format!(
                "{} must be between 0 and 1, got {}",
                name, ratio
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.filename.is_empty() || config.filename.contains('/') {
        return Err(ConfigError::Validation(format!(
            "output filename must be a plain file name, got '{}'",
            config.filename
        )));
    }

    Ok(())
}

fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
