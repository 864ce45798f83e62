//! Translation pair quality checks
//!
//! A pair of extracted texts is accepted only when every rule passes:
//!
//! | Rule | Rejects |
//! |------|---------|
//! | Minimum length | either text shorter than `min_length` characters |
//! | Length ratio | Welsh/English length outside the configured band |
//! | Identical | both sides carry the same text |
//! | English markers | English side with too few English function words |
//! | Welsh markers | Welsh side with too few Welsh function words |
//! | Untranslated | Welsh side with more English than Welsh markers |

mod markers;

pub use markers::{words, MarkerProfile};

use crate::config::QualityConfig;
use std::fmt;

/// Reason a pair was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// One side is shorter than the minimum length
    TooShort { english: usize, welsh: usize },

    /// Welsh/English length ratio outside the accepted band
    LengthRatio { ratio: f64 },

    /// Both sides carry the same text
    Identical,

    /// The English side does not read as English
    NotEnglish { ratio: f64 },

    /// The Welsh side does not read as Welsh
    NotWelsh { ratio: f64 },

    /// The Welsh side reads as English
    Untranslated,
}

impl Rejection {
    /// Short stable label, used for statistics
    pub fn label(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "too_short",
            Self::LengthRatio { .. } => "length_ratio",
            Self::Identical => "identical",
            Self::NotEnglish { .. } => "not_english",
            Self::NotWelsh { .. } => "not_welsh",
            Self::Untranslated => "untranslated",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { english, welsh } => {
                write!(f, "text too short (en: {} chars, cy: {} chars)", english, welsh)
            }
            Self::LengthRatio { ratio } => write!(f, "length ratio {:.2} outside band", ratio),
            Self::Identical => f.write_str("both sides are identical"),
            Self::NotEnglish { ratio } => write!(f, "English marker share {:.2} too low", ratio),
            Self::NotWelsh { ratio } => write!(f, "Welsh marker share {:.2} too low", ratio),
            Self::Untranslated => f.write_str("Welsh side reads as English"),
        }
    }
}

/// Heuristic acceptance test for English/Welsh text pairs
#[derive(Debug, Clone)]
pub struct QualityChecker {
    config: QualityConfig,
}

impl Default for QualityChecker {
    fn default() -> Self {
        Self::new(QualityConfig::default())
    }
}

impl QualityChecker {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Returns true when the pair passes every rule
    pub fn check(&self, en_text: &str, cy_text: &str) -> bool {
        self.evaluate(en_text, cy_text).is_ok()
    }

    /// Runs the rules in order and reports the first one that fails
    pub fn evaluate(&self, en_text: &str, cy_text: &str) -> Result<(), Rejection> {
        let en_text = en_text.trim();
        let cy_text = cy_text.trim();

        let en_len = en_text.chars().count();
        let cy_len = cy_text.chars().count();

        if en_len < self.config.min_length || cy_len < self.config.min_length {
            return Err(Rejection::TooShort {
                english: en_len,
                welsh: cy_len,
            });
        }

        let ratio = cy_len as f64 / en_len as f64;
        if ratio < self.config.min_length_ratio || ratio > self.config.max_length_ratio {
            return Err(Rejection::LengthRatio { ratio });
        }

        if en_text == cy_text {
            return Err(Rejection::Identical);
        }

        let en_profile = MarkerProfile::of(en_text);
        if en_profile.english_ratio() < self.config.min_english_ratio {
            return Err(Rejection::NotEnglish {
                ratio: en_profile.english_ratio(),
            });
        }

        let cy_profile = MarkerProfile::of(cy_text);
        if cy_profile.welsh_ratio() < self.config.min_welsh_ratio {
            return Err(Rejection::NotWelsh {
                ratio: cy_profile.welsh_ratio(),
            });
        }

        if cy_profile.welsh <= cy_profile.english {
            return Err(Rejection::Untranslated);
        }

        Ok(())
    }
}
