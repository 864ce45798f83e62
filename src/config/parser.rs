use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable overriding `scraper.workers`
pub const ENV_MAX_WORKERS: &str = "HARVEST_MAX_WORKERS";
/// Environment variable overriding `output.directory`
pub const ENV_OUTPUT_DIR: &str = "HARVEST_OUTPUT_DIR";
/// Environment variable overriding `output.filename`
pub const ENV_OUTPUT_FILE: &str = "HARVEST_OUTPUT_FILE";
/// Environment variable overriding `scraper.request-delay-ms`
pub const ENV_REQUEST_DELAY_MS: &str = "HARVEST_REQUEST_DELAY_MS";
/// Environment variable overriding `sitemap.root-url`
pub const ENV_SITEMAP_URL: &str = "HARVEST_SITEMAP_URL";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use bilingual_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Workers: {}", config.scraper.workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at start-up so the settings behind an output file can be traced.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Applies overrides from a variable lookup on top of a configuration
///
/// `lookup` is normally `std::env::var(..).ok()`; taking a closure keeps the
/// override rules testable without touching the process environment.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_MAX_WORKERS) {
        config.scraper.workers = parse_number(ENV_MAX_WORKERS, &value)?;
    }

    if let Some(value) = lookup(ENV_REQUEST_DELAY_MS) {
        config.scraper.request_delay_ms = parse_number(ENV_REQUEST_DELAY_MS, &value)?;
    }

    if let Some(value) = lookup(ENV_OUTPUT_DIR) {
        config.output.directory = value;
    }

    if let Some(value) = lookup(ENV_OUTPUT_FILE) {
        config.output.filename = value;
    }

    if let Some(value) = lookup(ENV_SITEMAP_URL) {
        config.sitemap.root_url = value;
    }

    Ok(())
}

/// Builds the effective configuration for a run
///
/// Starts from the file at `path` (or the defaults when no file is given),
/// applies environment overrides and validates the result.
///
/// Returns the configuration and the file hash, if a file was read.
pub fn load_effective_config(path: Option<&Path>) -> Result<(Config, Option<String>), ConfigError> {
    let (mut config, hash) = match path {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;

    Ok((config, hash))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::Validation(format!("{} must be a non-negative integer, got '{}'", key, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PairingMode, TextFormat};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[scraper]
workers = 8
request-delay-ms = 50
max-retries = 2

[sitemap]
root-url = "https://www.gov.wales/sitemap.xml"

[pairing]
mode = "language-link"

[quality]
min-length = 40

[output]
directory = "/tmp/harvest"
filename = "pairs.jsonl"
append = true
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.workers, 8);
        assert_eq!(config.scraper.request_delay_ms, 50);
        assert_eq!(config.scraper.max_retries, 2);
        assert_eq!(config.pairing.mode, PairingMode::LanguageLink);
        assert_eq!(config.quality.min_length, 40);
        assert!(config.output.append);
        assert_eq!(
            config.output.path(),
            std::path::PathBuf::from("/tmp/harvest/pairs.jsonl")
        );
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let file = create_temp_config("[scraper]\nworkers = 3\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scraper.workers, 3);
        assert_eq!(config.scraper.max_retries, 5);
        assert_eq!(config.pairing.english_segment, "en");
        assert_eq!(config.pairing.welsh_segment, "cy");
        assert_eq!(config.output.filename, "english_welsh_pairs.jsonl");
    }

    #[test]
    fn test_user_agent_and_extraction_keys() {
        let config_content = r#"
[user-agent]
crawler-name = "TestHarvest"
crawler-version = "2.1"
contact-url = "https://example.org/bot"
contact-email = "bot@example.org"

[extraction]
article-selector = "div.announcement-item__article"
format = "markdown"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.user_agent.crawler_name, "TestHarvest");
        assert_eq!(config.user_agent.crawler_version, "2.1");
        assert!(config.user_agent.header_value().contains("TestHarvest/2.1"));
        assert_eq!(
            config.extraction.article_selector.as_deref(),
            Some("div.announcement-item__article")
        );
        assert_eq!(config.extraction.format, TextFormat::Markdown);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[scraper]\nworkers = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_MAX_WORKERS, "4"),
            (ENV_OUTPUT_DIR, "/data"),
            (ENV_OUTPUT_FILE, "out.jsonl"),
            (ENV_REQUEST_DELAY_MS, "0"),
            (ENV_SITEMAP_URL, "https://example.org/sitemap.xml"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.scraper.workers, 4);
        assert_eq!(config.scraper.request_delay_ms, 0);
        assert_eq!(config.output.directory, "/data");
        assert_eq!(config.output.filename, "out.jsonl");
        assert_eq!(config.sitemap.root_url, "https://example.org/sitemap.xml");
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = Config::default();
        let result = apply_env_overrides(&mut config, |key| {
            (key == ENV_MAX_WORKERS).then(|| "many".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }
}
