use serde::{Deserialize, Serialize};

/// One accepted English/Welsh text pair
///
/// Serialized as a single JSON object per line:
/// `{"en": "...", "cy": "...", "url": "..."}` where `url` is the English
/// source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualRecord {
    pub en: String,
    pub cy: String,
    pub url: String,
}

impl BilingualRecord {
    pub fn new(en: impl Into<String>, cy: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            cy: cy.into(),
            url: url.into(),
        }
    }
}
