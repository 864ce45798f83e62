/// Pair outcome definitions
///
/// This module defines the terminal states a candidate pair can end in.
use crate::quality::Rejection;
use crate::url::Language;
use std::fmt;

/// Final state of one candidate pair
#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    // ===== Success =====
    /// Both pages fetched, extracted and accepted; a record was emitted
    Accepted,

    // ===== Page errors =====
    /// A page could not be fetched after the client's retries
    FetchFailed { language: Language, error: String },

    /// A page was fetched but had no usable content region
    NoContent { language: Language },

    // ===== Quality =====
    /// Both pages extracted but the texts failed a quality rule
    Rejected(Rejection),
}

impl PairOutcome {
    /// Returns true if a record was emitted
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for PairOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::FetchFailed { language, error } => {
                write!(f, "{} page fetch failed: {}", language, error)
            }
            Self::NoContent { language } => write!(f, "{} page has no content region", language),
            Self::Rejected(rejection) => write!(f, "rejected: {}", rejection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        assert!(PairOutcome::Accepted.is_success());

        let failed = PairOutcome::FetchFailed {
            language: Language::Welsh,
            error: "HTTP status 404".to_string(),
        };
        assert!(!failed.is_success());
        assert!(!PairOutcome::Rejected(Rejection::Identical).is_success());
    }

    #[test]
    fn test_rejected_display_names_rule() {
        let outcome = PairOutcome::Rejected(Rejection::Untranslated);
        assert_eq!(outcome.to_string(), "rejected: Welsh side reads as English");
    }

    #[test]
    fn test_display() {
        let outcome = PairOutcome::NoContent {
            language: Language::English,
        };
        assert_eq!(outcome.to_string(), "en page has no content region");
    }
}
