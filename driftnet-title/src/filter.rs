//! Adult-content keyword classification

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use driftnet_core::torrent::ContentFilter;

/// Keywords that flag a release name, matched as whole words.
static ADULT_KEYWORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(xxx|porn(?:o)?|hentai|jav|erotic|brazzers|onlyfans|milf)\b").unwrap()
});

/// Keyword-based [`ContentFilter`].
///
/// Deliberately blunt: a word-boundary regex over the raw name. False
/// negatives are acceptable, false positives on ordinary release names are
/// not, hence whole-word matching only.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordContentFilter;

impl KeywordContentFilter {
    /// Creates a filter. The keyword pattern is compiled once per process.
    pub fn new() -> Self {
        Self
    }
}

impl ContentFilter for KeywordContentFilter {
    fn is_adult(&self, name: &str) -> bool {
        let flagged = ADULT_KEYWORDS_RE.is_match(name);
        if flagged {
            debug!("Content filter flagged name: {}", name);
        }
        flagged
    }
}
