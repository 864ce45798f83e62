use serde::Deserialize;

/// Main configuration structure for Bilingual-Harvest
///
/// Every section is optional in the TOML file; missing sections and fields
/// fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub sitemap: SitemapConfig,
    pub pairing: PairingConfig,
    pub extraction: ExtractionConfig,
    pub quality: QualityConfig,
    pub output: OutputConfig,
}

/// Worker pool and request pacing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Number of candidate pairs processed concurrently
    pub workers: usize,

    /// Delay slept before every request attempt (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Retries after the first attempt for transient failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Backoff before the first retry (milliseconds); doubles per retry
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    /// Upper bound for a single backoff (milliseconds)
    #[serde(rename = "backoff-max-ms")]
    pub backoff_max_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            workers: 20,
            request_delay_ms: 200,
            max_retries: 5,
            backoff_base_ms: 100,
            backoff_max_ms: 10_000,
            timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "BilingualHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/bilingual-harvest".to_string(),
            contact_email: "harvest@example.org".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Sitemap location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Root sitemap or sitemap index URL
    #[serde(rename = "root-url")]
    pub root_url: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            root_url: "https://www.gov.wales/sitemap.xml".to_string(),
        }
    }
}

/// How English pages are matched to their Welsh counterparts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingMode {
    /// Swap the language path segment (`/en/...` <-> `/cy/...`)
    #[default]
    PathSegment,

    /// Follow the language switch link found on each page
    LanguageLink,
}

/// Pair derivation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    pub mode: PairingMode,

    /// Path segment marking English pages
    #[serde(rename = "english-segment")]
    pub english_segment: String,

    /// Path segment marking Welsh pages
    #[serde(rename = "welsh-segment")]
    pub welsh_segment: String,

    /// Selector for the language switch anchor (language-link mode)
    #[serde(rename = "language-link-selector")]
    pub language_link_selector: String,

    /// Text the language switch anchor must carry (language-link mode)
    #[serde(rename = "language-link-text")]
    pub language_link_text: String,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            mode: PairingMode::PathSegment,
            english_segment: "en".to_string(),
            welsh_segment: "cy".to_string(),
            language_link_selector: "a.language-link".to_string(),
            language_link_text: "Cymraeg".to_string(),
        }
    }
}

/// How extracted content is rendered into record text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextFormat {
    /// Paragraphs of plain text separated by blank lines
    #[default]
    Plain,

    /// Markdown with headings and emphasis kept and links reduced to their text
    Markdown,
}

/// Content extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Candidate selectors for the main content region, tried in order
    #[serde(rename = "content-selectors")]
    pub content_selectors: Vec<String>,

    /// Subtrees matching these selectors are dropped from the content
    #[serde(rename = "boilerplate-selectors")]
    pub boilerplate_selectors: Vec<String>,

    /// Selector for repeated article blocks; when set, each page yields one
    /// text per match and the English and Welsh articles are paired by position
    #[serde(rename = "article-selector")]
    pub article_selector: Option<String>,

    pub format: TextFormat,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        let content = ["main", "[role='main']", "article", "#main-content", ".main-content"];
        let boilerplate = [
            "nav",
            "header",
            "footer",
            "aside",
            "script",
            "style",
            "noscript",
            "template",
            "form",
            ".breadcrumb",
            ".breadcrumbs",
            ".language-link",
            ".skip-link",
        ];

        Self {
            content_selectors: content.iter().map(|s| s.to_string()).collect(),
            boilerplate_selectors: boilerplate.iter().map(|s| s.to_string()).collect(),
            article_selector: None,
            format: TextFormat::Plain,
        }
    }
}

/// Translation pair acceptance thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Minimum trimmed length of each text (characters)
    #[serde(rename = "min-length")]
    pub min_length: usize,

    /// Lowest accepted Welsh/English length ratio
    #[serde(rename = "min-length-ratio")]
    pub min_length_ratio: f64,

    /// Highest accepted Welsh/English length ratio
    #[serde(rename = "max-length-ratio")]
    pub max_length_ratio: f64,

    /// Minimum share of Welsh marker words in the Welsh text
    #[serde(rename = "min-welsh-ratio")]
    pub min_welsh_ratio: f64,

    /// Minimum share of English marker words in the English text
    #[serde(rename = "min-english-ratio")]
    pub min_english_ratio: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_length: 20,
            min_length_ratio: 0.5,
            max_length_ratio: 2.0,
            min_welsh_ratio: 0.08,
            min_english_ratio: 0.05,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the record file is written to
    pub directory: String,

    /// Record file name
    pub filename: String,

    /// Keep records from earlier runs instead of truncating the file
    pub append: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "/app/output".to_string(),
            filename: "english_welsh_pairs.jsonl".to_string(),
            append: false,
        }
    }
}

impl OutputConfig {
    /// Full path of the record file
    pub fn path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.directory).join(&self.filename)
    }
}
