//! Text-level presence patterns.
//!
//! A [`PresencePattern`] answers "does this keyword occur in the page text?"
//! against the folded page text. It never produces geometry.

use regex::{Regex, RegexBuilder};

use crate::error::PatternError;
use crate::keyword::{Keyword, MatchMode};
use crate::normalize::PUNCTUATION;

/// A compiled presence test for one keyword.
#[derive(Debug, Clone)]
pub struct PresencePattern {
    regex: Regex,
}

impl PresencePattern {
    /// Compile the presence test for `keyword`.
    ///
    /// The folded keyword is always escaped, so any character in it matches
    /// literally. Exact mode requires a word boundary before the keyword and
    /// whitespace, a [`PUNCTUATION`] character or end of text after it.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern cannot be compiled, e.g. when
    /// it exceeds `size_limit`.
    pub fn compile(keyword: &Keyword, size_limit: usize) -> Result<Self, PatternError> {
        let source = pattern_source(keyword.normalized(), keyword.mode());
        RegexBuilder::new(&source)
            .case_insensitive(true)
            .size_limit(size_limit)
            .build()
            .map(|regex| Self { regex })
            .map_err(|e| PatternError {
                keyword: keyword.text().to_string(),
                reason: e.to_string(),
            })
    }

    /// Whether the keyword occurs in `normalized_text`.
    ///
    /// `normalized_text` is expected to be the output of
    /// [`normalize`](crate::normalize::normalize).
    pub fn is_present_in(&self, normalized_text: &str) -> bool {
        self.regex.is_match(normalized_text)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Build the regex source for a folded keyword.
fn pattern_source(normalized: &str, mode: MatchMode) -> String {
    let literal = regex::escape(normalized);
    match mode {
        MatchMode::Partial => literal,
        MatchMode::Exact => format!(r"\b{literal}(?:\s|{}|$)", punctuation_class()),
    }
}

/// The [`PUNCTUATION`] set as a bracketed character class.
fn punctuation_class() -> String {
    let mut class = String::from("[");
    for &c in PUNCTUATION {
        class.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
    }
    class.push(']');
    class
}
