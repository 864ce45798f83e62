//! English/Welsh URL pair derivation
//!
//! Pages are paired by swapping the language path segment: the Welsh
//! counterpart of `https://example.org/en/news` is
//! `https://example.org/cy/news`. Only the first segment that equals one of
//! the two markers is considered.

use std::collections::BTreeSet;
use std::fmt;
use url::Url;

/// Language of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Welsh,
}

impl Language {
    /// ISO 639-1 code, also used as the record field name
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Welsh => "cy",
        }
    }

    /// The other language of the pair
    pub fn other(&self) -> Self {
        match self {
            Self::English => Self::Welsh,
            Self::Welsh => Self::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A pair of URLs believed to hold the same content in both languages
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageCandidatePair {
    pub english_url: Url,
    pub welsh_url: Url,
}

impl PageCandidatePair {
    pub fn new(english_url: Url, welsh_url: Url) -> Self {
        Self {
            english_url,
            welsh_url,
        }
    }
}

/// The two path segments that identify a page's language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageMarkers {
    pub english: String,
    pub welsh: String,
}

impl Default for LanguageMarkers {
    fn default() -> Self {
        Self::new("en", "cy")
    }
}

impl LanguageMarkers {
    pub fn new(english: impl Into<String>, welsh: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            welsh: welsh.into(),
        }
    }

    fn marker(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Welsh => &self.welsh,
        }
    }

    /// Finds the language segment of a URL
    ///
    /// Returns the segment index and the language it marks, or `None` when
    /// no path segment equals either marker.
    pub fn detect(&self, url: &Url) -> Option<(usize, Language)> {
        url.path_segments()?
            .enumerate()
            .find_map(|(index, segment)| {
                if segment == self.english {
                    Some((index, Language::English))
                } else if segment == self.welsh {
                    Some((index, Language::Welsh))
                } else {
                    None
                }
            })
    }

    /// Computes the counterpart of a URL in the other language
    ///
    /// Works in both directions. Query string is carried over unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use bilingual_harvest::url::{Language, LanguageMarkers};
    /// use url::Url;
    ///
    /// let markers = LanguageMarkers::default();
    /// let en = Url::parse("https://example.org/en/news/item-1").unwrap();
    /// let (language, cy) = markers.counterpart(&en).unwrap();
    /// assert_eq!(language, Language::Welsh);
    /// assert_eq!(cy.as_str(), "https://example.org/cy/news/item-1");
    /// ```
    pub fn counterpart(&self, url: &Url) -> Option<(Language, Url)> {
        let (index, language) = self.detect(url)?;
        let target = language.other();

        let segments: Vec<&str> = url
            .path_segments()?
            .enumerate()
            .map(|(i, segment)| {
                if i == index {
                    self.marker(target)
                } else {
                    segment
                }
            })
            .collect();

        let mut counterpart = url.clone();
        counterpart.set_path(&format!("/{}", segments.join("/")));

        Some((target, counterpart))
    }
}

/// Derives candidate pairs from a set of discovered URLs
///
/// A pair is emitted only when both the English URL and its computed Welsh
/// counterpart are present in `urls`. Each pair is emitted once, and the
/// result is sorted, so the same input always yields the same output.
/// URLs without a language segment are dropped.
///
/// # Examples
///
/// ```
/// use bilingual_harvest::url::{derive_pairs, LanguageMarkers};
/// use url::Url;
///
/// let urls: Vec<Url> = [
///     "https://example.org/en/a",
///     "https://example.org/cy/a",
///     "https://example.org/en/only-english",
/// ]
/// .iter()
/// .map(|u| Url::parse(u).unwrap())
/// .collect();
///
/// let pairs = derive_pairs(&urls, &LanguageMarkers::default());
/// assert_eq!(pairs.len(), 1);
/// assert_eq!(pairs[0].welsh_url.path(), "/cy/a");
/// ```
pub fn derive_pairs(urls: &[Url], markers: &LanguageMarkers) -> Vec<PageCandidatePair> {
    let known: BTreeSet<&str> = urls.iter().map(Url::as_str).collect();
    let mut pairs = BTreeSet::new();
    let mut unmarked = 0usize;

    for url in urls {
        let Some((language, counterpart)) = markers.counterpart(url) else {
            unmarked += 1;
            continue;
        };

        if !known.contains(counterpart.as_str()) {
            continue;
        }

        let pair = match language {
            // `url` is English, its counterpart Welsh
            Language::Welsh => PageCandidatePair::new(url.clone(), counterpart),
            Language::English => PageCandidatePair::new(counterpart, url.clone()),
        };
        pairs.insert(pair);
    }

    tracing::debug!(
        "Derived {} pairs from {} URLs ({} without a language segment)",
        pairs.len(),
        urls.len(),
        unmarked
    );

    pairs.into_iter().collect()
}
