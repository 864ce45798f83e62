//! HTML content extraction
//!
//! This module handles parsing HTML pages to extract:
//! - The text of the main content region, without navigation and other boilerplate
//! - The text of each repeated article block, when an article selector is set
//! - The language switch link pointing at a page's Welsh counterpart
//!
//! Text is rendered as plain paragraphs or, in markdown mode, through `htmd`
//! with links reduced to their text.

use crate::config::{ExtractionConfig, PairingConfig, TextFormat};
use crate::ConfigError;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Elements that start a new line in the extracted text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "details", "div", "dl", "dt",
    "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p",
    "pre", "section", "summary", "table", "td", "th", "tr", "ul",
];

/// Pulls the main text out of an HTML page
///
/// Selectors are compiled once at construction and shared by every worker.
#[derive(Debug)]
pub struct ContentExtractor {
    content: Vec<Selector>,
    boilerplate: Vec<Selector>,
    article: Option<Selector>,
    format: TextFormat,
    language_link: Selector,
    language_link_text: String,
}

impl ContentExtractor {
    /// Compiles the configured selectors
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSelector` for a selector that does not parse.
    pub fn new(extraction: &ExtractionConfig, pairing: &PairingConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            content: compile_all(&extraction.content_selectors)?,
            boilerplate: compile_all(&extraction.boilerplate_selectors)?,
            article: extraction.article_selector.as_deref().map(compile).transpose()?,
            format: extraction.format,
            language_link: compile(&pairing.language_link_selector)?,
            language_link_text: pairing.language_link_text.trim().to_lowercase(),
        })
    }

    /// Extracts the text of the first content region that has any
    ///
    /// Content selectors are tried in order. Subtrees matching a boilerplate
    /// selector are skipped. Block elements become paragraph breaks and runs
    /// of whitespace collapse to a single space.
    ///
    /// Returns `None` when no region yields text.
    ///
    /// # Example
    ///
    /// ```
    /// use bilingual_harvest::config::{ExtractionConfig, PairingConfig};
    /// use bilingual_harvest::crawler::ContentExtractor;
    ///
    /// let extractor =
    ///     ContentExtractor::new(&ExtractionConfig::default(), &PairingConfig::default()).unwrap();
    /// let html = "<body><nav>Menu</nav><main><h1>Title</h1><p>Body  text</p></main></body>";
    /// assert_eq!(extractor.extract(html), Some("Title\n\nBody text".to_string()));
    /// ```
    pub fn extract(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        self.content
            .iter()
            .flat_map(|selector| document.select(selector))
            .map(|region| self.render(region))
            .find(|text| !text.is_empty())
    }

    /// Returns true when pages are split into article blocks
    pub fn splits_articles(&self) -> bool {
        self.article.is_some()
    }

    /// Extracts the text of every article block, in document order
    ///
    /// Blocks that render empty are kept so that positions line up between
    /// the English and Welsh pages. Returns an empty list when no article
    /// selector is configured or nothing matches.
    pub fn extract_articles(&self, html: &str) -> Vec<String> {
        let Some(article) = &self.article else {
            return Vec::new();
        };
        let document = Html::parse_document(html);

        document
            .select(article)
            .map(|block| self.render(block))
            .collect()
    }

    /// Finds the language switch link and resolves it against `base_url`
    ///
    /// The anchor must match the language link selector and its text must
    /// equal the configured label, ignoring case and surrounding whitespace.
    pub fn find_language_link(&self, html: &str, base_url: &Url) -> Option<Url> {
        let document = Html::parse_document(html);

        document
            .select(&self.language_link)
            .filter(|anchor| {
                let text: String = anchor.text().collect();
                text.trim().to_lowercase() == self.language_link_text
            })
            .filter_map(|anchor| anchor.value().attr("href"))
            .find_map(|href| resolve_link(href, base_url))
    }

    fn render(&self, region: ElementRef<'_>) -> String {
        match self.format {
            TextFormat::Plain => self.region_text(region),
            TextFormat::Markdown => self.region_markdown(region),
        }
    }

    fn region_text(&self, region: ElementRef<'_>) -> String {
        let mut raw = String::new();
        self.collect_text(region, &mut raw);
        tidy(&raw)
    }

    fn region_markdown(&self, region: ElementRef<'_>) -> String {
        let mut markup = String::new();
        self.collect_markup(region, &mut markup);

        match htmd::convert(&markup) {
            Ok(markdown) => markdown.trim().to_string(),
            Err(e) => {
                tracing::debug!("Markdown conversion failed, using plain text: {}", e);
                self.region_text(region)
            }
        }
    }

    /// Rebuilds the region as bare HTML for the markdown converter
    ///
    /// Boilerplate and images are dropped, anchors are replaced by their
    /// contents and attributes are not carried over.
    fn collect_markup(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => escape_into(text, out),
                Node::Element(_) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if self.is_boilerplate(&child) {
                        continue;
                    }

                    match child.value().name() {
                        "a" => self.collect_markup(child, out),
                        "img" => {}
                        name @ ("br" | "hr") => {
                            out.push('<');
                            out.push_str(name);
                            out.push('>');
                        }
                        name => {
                            out.push('<');
                            out.push_str(name);
                            out.push('>');
                            self.collect_markup(child, out);
                            out.push_str("</");
                            out.push_str(name);
                            out.push('>');
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_text(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
                }
                Node::Element(_) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if self.is_boilerplate(&child) {
                        continue;
                    }

                    let block = BLOCK_ELEMENTS.contains(&child.value().name());
                    if block {
                        out.push('\n');
                    }
                    self.collect_text(child, out);
                    if block {
                        out.push('\n');
                    }
                }
                _ => {}
            }
        }
    }

    fn is_boilerplate(&self, element: &ElementRef<'_>) -> bool {
        self.boilerplate.iter().any(|selector| selector.matches(element))
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{}: {:?}", selector, e)))
}

fn compile_all(selectors: &[String]) -> Result<Vec<Selector>, ConfigError> {
    selectors.iter().map(|s| compile(s)).collect()
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

/// Collapses whitespace in each line and joins non-empty lines as paragraphs
fn tidy(raw: &str) -> String {
    raw.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| href.starts_with(scheme))
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);

    Some(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ContentExtractor {
        ContentExtractor::new(&ExtractionConfig::default(), &PairingConfig::default()).unwrap()
    }

    fn base_url() -> Url {
        Url::parse("https://example.org/en/news/item").unwrap()
    }

    #[test]
    fn test_extracts_main_region() {
        let html = r#"
            <html>
            <head><title>Ignored</title></head>
            <body>
                <header>Site header</header>
                <nav><a href="/">Home</a></nav>
                <main>
                    <h1>Funding   announced</h1>
                    <p>The Welsh Government
                       has announced funding.</p>
                </main>
                <footer>Copyright</footer>
            </body>
            </html>
        "#;

        assert_eq!(
            extractor().extract(html),
            Some("Funding announced\n\nThe Welsh Government has announced funding.".to_string())
        );
    }

    #[test]
    fn test_boilerplate_inside_main_is_dropped() {
        let html = r#"
            <main>
                <div class="breadcrumb"><a href="/">Home</a> &gt; News</div>
                <p>Story text.</p>
                <script>var tracking = 1;</script>
                <aside>Related links</aside>
            </main>
        "#;

        assert_eq!(extractor().extract(html), Some("Story text.".to_string()));
    }

    #[test]
    fn test_inline_elements_stay_on_one_line() {
        let html = "<main><p>Read <a href=\"/x\">the guidance</a> <strong>now</strong>.</p></main>";
        assert_eq!(
            extractor().extract(html),
            Some("Read the guidance now.".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_later_selector() {
        let html = r#"<body><main>   </main><article><p>Article body</p></article></body>"#;
        assert_eq!(extractor().extract(html), Some("Article body".to_string()));
    }

    #[test]
    fn test_no_content_region() {
        let html = r#"<body><div class="page"><p>Loose text</p></div></body>"#;
        assert_eq!(extractor().extract(html), None);
    }

    #[test]
    fn test_empty_main_is_no_content() {
        let html = r#"<body><main><nav>Only navigation</nav></main></body>"#;
        assert_eq!(extractor().extract(html), None);
    }

    #[test]
    fn test_custom_selectors() {
        let extraction = ExtractionConfig {
            content_selectors: vec!["#body".to_string()],
            boilerplate_selectors: vec![".note".to_string()],
            ..ExtractionConfig::default()
        };
        let extractor = ContentExtractor::new(&extraction, &PairingConfig::default()).unwrap();

        let html = r#"<main>Wrong</main><div id="body">Right<span class="note"> (hidden)</span></div>"#;
        assert_eq!(extractor.extract(html), Some("Right".to_string()));
    }

    fn with_extraction(article_selector: Option<&str>, format: TextFormat) -> ContentExtractor {
        let extraction = ExtractionConfig {
            article_selector: article_selector.map(str::to_string),
            format,
            ..ExtractionConfig::default()
        };
        ContentExtractor::new(&extraction, &PairingConfig::default()).unwrap()
    }

    #[test]
    fn test_markdown_keeps_structure_and_strips_links() {
        let html = r#"
            <main>
                <h1 class="title">Funding announced</h1>
                <p>Read <a href="/guidance">the guidance</a> <strong>now</strong> &amp; apply.</p>
                <img src="/banner.png" alt="Banner">
                <ul><li>Schools</li><li>Colleges</li></ul>
                <nav>Skip me</nav>
            </main>
        "#;

        let markdown = with_extraction(None, TextFormat::Markdown)
            .extract(html)
            .unwrap();

        assert!(markdown.starts_with("# Funding announced"), "{}", markdown);
        assert!(markdown.contains("the guidance"));
        assert!(markdown.contains("**now**"));
        assert!(markdown.contains("& apply"));
        assert!(markdown.contains("Schools"));
        assert!(!markdown.contains("]("));
        assert!(!markdown.contains("/guidance"));
        assert!(!markdown.contains("banner"));
        assert!(!markdown.contains("Skip me"));
        assert!(!markdown.contains('<'));
    }

    #[test]
    fn test_markdown_of_empty_region_is_no_content() {
        let html = r#"<body><main><nav>Only navigation</nav></main></body>"#;
        assert_eq!(with_extraction(None, TextFormat::Markdown).extract(html), None);
    }

    #[test]
    fn test_extracts_every_article() {
        let html = r#"
            <main>
                <div class="announcement-item__article"><p>First   story.</p></div>
                <div class="announcement-item__article"><nav>Menu</nav></div>
                <div class="announcement-item__article"><p>Third story.</p></div>
            </main>
        "#;

        let extractor = with_extraction(Some("div.announcement-item__article"), TextFormat::Plain);
        assert!(extractor.splits_articles());
        assert_eq!(
            extractor.extract_articles(html),
            vec!["First story.".to_string(), String::new(), "Third story.".to_string()]
        );
    }

    #[test]
    fn test_no_article_selector() {
        let extractor = extractor();
        assert!(!extractor.splits_articles());
        assert!(extractor
            .extract_articles("<div class=\"announcement-item__article\">x</div>")
            .is_empty());
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let extraction = ExtractionConfig {
            content_selectors: vec!["main[".to_string()],
            ..ExtractionConfig::default()
        };
        assert!(matches!(
            ContentExtractor::new(&extraction, &PairingConfig::default()),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_finds_language_link() {
        let html = r#"
            <header>
                <a class="language-link" href="/en/news/item">English</a>
                <a class="language-link" href="/cy/newyddion/eitem#top"> cymraeg </a>
            </header>
        "#;

        assert_eq!(
            extractor().find_language_link(html, &base_url()),
            Some(Url::parse("https://example.org/cy/newyddion/eitem").unwrap())
        );
    }

    #[test]
    fn test_language_link_requires_class_and_text() {
        let html = r#"
            <a href="/cy/page">Cymraeg</a>
            <a class="language-link" href="/fr/page">Français</a>
        "#;
        assert_eq!(extractor().find_language_link(html, &base_url()), None);
    }

    #[test]
    fn test_resolve_link_rules() {
        let base = base_url();
        assert_eq!(
            resolve_link("../other", &base).map(|u| u.to_string()),
            Some("https://example.org/en/other".to_string())
        );
        assert_eq!(resolve_link("#section", &base), None);
        assert_eq!(resolve_link("javascript:void(0)", &base), None);
        assert_eq!(resolve_link("mailto:a@example.org", &base), None);
        assert_eq!(resolve_link("ftp://example.org/file", &base), None);
        assert_eq!(resolve_link("   ", &base), None);
    }

    #[test]
    fn test_tidy() {
        assert_eq!(tidy("\n  a  b \n\n\n c\n"), "a b\n\nc");
        assert_eq!(tidy(" \n \n"), "");
    }
}
