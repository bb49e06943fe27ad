//! Keywords and their match modes.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::normalize::normalize;

/// How a keyword occurrence qualifies as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MatchMode {
    /// Whole word only, optionally followed by whitespace, punctuation or end of text.
    Exact,
    /// Anywhere, including inside longer words.
    #[default]
    Partial,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Partial => "partial",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "partial" => Ok(MatchMode::Partial),
            other => Err(format!(
                "invalid match mode '{other}' (expected 'exact' or 'partial')"
            )),
        }
    }
}

/// A user-supplied keyword with its match mode.
///
/// The original spelling is kept for geometry search and reporting; the
/// folded form is computed once for text-level comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Keyword {
    text: String,
    mode: MatchMode,
    #[cfg_attr(feature = "serde", serde(skip))]
    normalized: String,
}

impl Keyword {
    pub fn new(text: impl Into<String>, mode: MatchMode) -> Self {
        let text = text.into();
        let normalized = normalize(&text);
        Self {
            text,
            mode,
            normalized,
        }
    }

    pub fn exact(text: impl Into<String>) -> Self {
        Self::new(text, MatchMode::Exact)
    }

    pub fn partial(text: impl Into<String>) -> Self {
        Self::new(text, MatchMode::Partial)
    }

    /// The keyword as the user typed it.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Accent- and case-folded form used for comparisons.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// An ordered, duplicate-free list of keywords.
///
/// Iteration order is the order in which keywords were first supplied.
/// A later keyword with the same text as an earlier one is dropped, so the
/// first mode given for a text wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct KeywordList {
    keywords: Vec<Keyword>,
}

impl KeywordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a keyword. Returns `false` if its text was already present.
    pub fn push(&mut self, keyword: Keyword) -> bool {
        if self.keywords.iter().any(|k| k.text == keyword.text) {
            return false;
        }
        self.keywords.push(keyword);
        true
    }

    /// Build a list from comma-separated keywords plus the set selected for
    /// exact matching, e.g. `"Metodologías activas, ODS, Reto"` with `["Reto"]`.
    ///
    /// Entries are trimmed and blank entries skipped. A keyword is exact when
    /// its trimmed text is in `exact`; every other keyword is partial. Names
    /// in `exact` that are not in the list are ignored.
    pub fn from_comma_separated<'a>(
        input: &str,
        exact: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let exact: HashSet<&str> = exact.into_iter().map(str::trim).collect();
        input
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let mode = if exact.contains(entry) {
                    MatchMode::Exact
                } else {
                    MatchMode::Partial
                };
                Keyword::new(entry, mode)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Keyword> {
        self.keywords.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyword> {
        self.keywords.iter()
    }

    pub fn as_slice(&self) -> &[Keyword] {
        &self.keywords
    }
}

impl FromIterator<Keyword> for KeywordList {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        let mut list = KeywordList::new();
        for keyword in iter {
            list.push(keyword);
        }
        list
    }
}

impl<S: Into<String>> FromIterator<(S, MatchMode)> for KeywordList {
    fn from_iter<I: IntoIterator<Item = (S, MatchMode)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(text, mode)| Keyword::new(text, mode))
            .collect()
    }
}

impl<'a> IntoIterator for &'a KeywordList {
    type Item = &'a Keyword;
    type IntoIter = std::slice::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.iter()
    }
}
