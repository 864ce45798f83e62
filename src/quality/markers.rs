//! Language marker words
//!
//! Short function words that are frequent in one language and rare in the
//! other. Words shared by both languages ("a", "i") are left out of both
//! lists.

/// Frequent English function words
const ENGLISH_MARKERS: &[&str] = &[
    "the", "and", "of", "to", "in", "is", "for", "on", "that", "by", "are", "you", "we", "with",
    "as", "at", "from", "have", "has", "was", "were", "will", "be", "this", "it", "or", "not",
    "your", "our", "their", "which", "an", "can", "been", "about", "more", "these",
];

/// Frequent Welsh function words, including the common `'r` contractions
const WELSH_MARKERS: &[&str] = &[
    "y", "yr", "ac", "yn", "ar", "mae", "gyda", "bod", "gan", "ei", "yng", "ym", "chi",
    "yw", "wedi", "ein", "eich", "hyn", "hynny", "sydd", "neu", "ond", "dros", "drwy", "trwy",
    "fel", "bydd", "roedd", "oedd", "cael", "gael", "nid", "ddim", "ni", "ydy", "ydyn", "hefyd",
    "gyfer", "rhwng", "mewn", "i'r", "a'r", "o'r", "â'r", "mae'r", "yw'r", "eu",
];

/// Circumflexed vowels that occur in Welsh but almost never in English
///
/// Checked after lowercasing.
const WELSH_DIACRITICS: &[char] = &['â', 'ê', 'î', 'ô', 'û', 'ŵ', 'ŷ'];

/// Splits text into lowercase words with surrounding punctuation removed
///
/// Apostrophes inside a word are kept so that contractions such as `i'r`
/// stay intact. Curly apostrophes are folded to `'`.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|raw| {
            raw.trim_matches(|c: char| !c.is_alphanumeric())
                .replace('\u{2019}', "'")
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
}

fn is_english_marker(word: &str) -> bool {
    ENGLISH_MARKERS.contains(&word)
}

fn is_welsh_marker(word: &str) -> bool {
    WELSH_MARKERS.contains(&word) || word.chars().any(|c| WELSH_DIACRITICS.contains(&c))
}

/// Marker word counts for one text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerProfile {
    pub words: usize,
    pub english: usize,
    pub welsh: usize,
}

impl MarkerProfile {
    /// Counts marker words in a text
    pub fn of(text: &str) -> Self {
        words(text).fold(Self::default(), |mut profile, word| {
            profile.words += 1;
            if is_english_marker(&word) {
                profile.english += 1;
            }
            if is_welsh_marker(&word) {
                profile.welsh += 1;
            }
            profile
        })
    }

    /// Share of English marker words, 0.0 for an empty text
    pub fn english_ratio(&self) -> f64 {
        ratio(self.english, self.words)
    }

    /// Share of Welsh marker words, 0.0 for an empty text
    pub fn welsh_ratio(&self) -> f64 {
        ratio(self.welsh, self.words)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_strip_punctuation() {
        let list: Vec<String> = words("Mae'r \"Llywodraeth\" (Cymru), heddiw.").collect();
        assert_eq!(list, vec!["mae'r", "llywodraeth", "cymru", "heddiw"]);
    }

    #[test]
    fn test_curly_apostrophe_folded() {
        let list: Vec<String> = words("i\u{2019}r ysgol").collect();
        assert_eq!(list[0], "i'r");
    }

    #[test]
    fn test_english_profile() {
        let profile = MarkerProfile::of("The school is open to all pupils in the area.");
        assert_eq!(profile.words, 10);
        assert_eq!(profile.english, 5);
        assert_eq!(profile.welsh, 0);
    }

    #[test]
    fn test_welsh_profile() {
        let profile = MarkerProfile::of("Mae'r ysgol ar agor i bawb yn yr ardal.");
        assert_eq!(profile.words, 9);
        // mae'r, ar, yn, yr
        assert_eq!(profile.welsh, 4);
        assert_eq!(profile.english, 0);
    }

    #[test]
    fn test_diacritics_count_as_welsh() {
        let profile = MarkerProfile::of("dŵr tŷ");
        assert_eq!(profile.welsh, 2);
    }

    #[test]
    fn test_empty_text_ratios() {
        let profile = MarkerProfile::of("   ");
        assert_eq!(profile.words, 0);
        assert_eq!(profile.english_ratio(), 0.0);
        assert_eq!(profile.welsh_ratio(), 0.0);
    }
}
