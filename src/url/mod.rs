//! URL handling module for Bilingual-Harvest
//!
//! This module provides sitemap URL normalization and English/Welsh pair
//! derivation.

mod normalize;
mod pairs;

use crate::config::PairingConfig;

// Re-export main functions
pub use normalize::normalize_url;
pub use pairs::{derive_pairs, Language, LanguageMarkers, PageCandidatePair};

impl From<&PairingConfig> for LanguageMarkers {
    fn from(config: &PairingConfig) -> Self {
        Self::new(config.english_segment.clone(), config.welsh_segment.clone())
    }
}
