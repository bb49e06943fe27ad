//! Outcome of a highlighting run.

use crate::error::PatternError;
use crate::keyword::MatchMode;

/// Per-keyword counters collected over the whole document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeywordStats {
    pub keyword: String,
    pub mode: MatchMode,
    /// Pages (0-based) whose text contains the keyword.
    pub pages_present: Vec<usize>,
    /// Rendered occurrences located by the rectangle search.
    pub occurrences: usize,
    /// Highlights drawn after boundary confirmation.
    pub highlights: usize,
}

impl KeywordStats {
    pub(crate) fn new(keyword: &str, mode: MatchMode) -> Self {
        Self {
            keyword: keyword.to_string(),
            mode,
            pages_present: Vec::new(),
            occurrences: 0,
            highlights: 0,
        }
    }

    pub fn is_present(&self) -> bool {
        !self.pages_present.is_empty()
    }
}

/// Summary returned once every page has been processed.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HighlightReport {
    /// Number of pages processed.
    pub page_count: usize,
    /// Keywords whose text never appeared on any page, in list order.
    pub unmatched: Vec<String>,
    /// Keywords skipped because their pattern could not be built.
    pub malformed: Vec<PatternError>,
    /// One entry per keyword, in list order.
    pub keywords: Vec<KeywordStats>,
}

impl HighlightReport {
    /// Whether every keyword was found somewhere in the document.
    pub fn all_found(&self) -> bool {
        self.unmatched.is_empty()
    }

    pub fn total_highlights(&self) -> usize {
        self.keywords.iter().map(|k| k.highlights).sum()
    }

    /// Keywords present in the page text that never got a highlight.
    ///
    /// Presence and highlighting are decided separately, so a keyword can be
    /// reported as found while no rendered occurrence passed confirmation.
    pub fn found_without_highlight(&self) -> Vec<&str> {
        self.keywords
            .iter()
            .filter(|k| k.is_present() && k.highlights == 0)
            .map(|k| k.keyword.as_str())
            .collect()
    }

    pub fn stats(&self, keyword: &str) -> Option<&KeywordStats> {
        self.keywords.iter().find(|k| k.keyword == keyword)
    }
}
