//! Configuration module for Bilingual-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and layering environment overrides on top.
//!
//! # Example
//!
//! ```no_run
//! use bilingual_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Writing to {}", config.output.path().display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractionConfig, OutputConfig, PairingConfig, PairingMode, QualityConfig,
    ScraperConfig, SitemapConfig, TextFormat, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash,
    load_effective_config, ENV_MAX_WORKERS, ENV_OUTPUT_DIR, ENV_OUTPUT_FILE,
    ENV_REQUEST_DELAY_MS, ENV_SITEMAP_URL,
};
pub use validation::validate;
