//! Literal text search with position over a page's glyphs.

use regex::RegexBuilder;

use crate::geometry::BBox;
use crate::text::Char;
use crate::words::{Adjacency, WordOptions, adjacency};

/// A single literal match with its bounding box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchMatch {
    /// The matched text as it appears in the page text.
    pub text: String,
    /// Union bounding box of all constituent glyphs.
    pub bbox: BBox,
    /// Indices into the page's glyph array for the matched glyphs.
    pub char_indices: Vec<usize>,
}

/// A page's plain text together with the glyph behind every byte of it.
///
/// Glyphs are concatenated in reading order. Where two glyphs are far enough
/// apart to belong to different words a space is synthesized, and a newline
/// where they sit on different lines, so the text reads the way the page
/// renders even when the content stream never paints a space glyph.
/// Synthesized bytes map to no glyph.
#[derive(Debug, Clone, Default)]
pub struct PageTextIndex {
    chars: Vec<Char>,
    text: String,
    byte_to_char: Vec<Option<usize>>,
}

impl PageTextIndex {
    pub fn new(chars: Vec<Char>, options: &WordOptions) -> Self {
        let mut text = String::new();
        let mut byte_to_char: Vec<Option<usize>> = Vec::new();
        let mut last: Option<usize> = None;

        for (i, ch) in chars.iter().enumerate() {
            if ch.is_blank() {
                if !text.is_empty() && !text.ends_with(char::is_whitespace) {
                    text.push(' ');
                    byte_to_char.push(Some(i));
                }
                continue;
            }

            if let Some(prev) = last {
                match adjacency(&chars[prev], ch, options) {
                    Adjacency::LineBreak => {
                        let trimmed = text.trim_end_matches(' ').len();
                        text.truncate(trimmed);
                        byte_to_char.truncate(trimmed);
                        text.push('\n');
                        byte_to_char.push(None);
                    }
                    Adjacency::WordBreak if !text.ends_with(char::is_whitespace) => {
                        text.push(' ');
                        byte_to_char.push(None);
                    }
                    _ => {}
                }
            }

            let start = text.len();
            text.push_str(&ch.text);
            byte_to_char.extend(std::iter::repeat_n(Some(i), text.len() - start));
            last = Some(i);
        }

        Self {
            chars,
            text,
            byte_to_char,
        }
    }

    /// The page text in reading order.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Find every occurrence of `literal` and return its glyph bounding box.
    ///
    /// `literal` is matched as plain text, never as a pattern. Matches that
    /// cover only synthesized separators are dropped.
    pub fn find(&self, literal: &str, case_sensitive: bool) -> Vec<SearchMatch> {
        if self.text.is_empty() || literal.is_empty() {
            return Vec::new();
        }

        let re = match RegexBuilder::new(&regex::escape(literal))
            .case_insensitive(!case_sensitive)
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(literal, error = %e, "literal search could not be compiled");
                return Vec::new();
            }
        };

        let mut results = Vec::new();
        for m in re.find_iter(&self.text) {
            let mut char_indices: Vec<usize> = Vec::new();
            for idx in self.byte_to_char[m.start()..m.end()].iter().flatten() {
                if char_indices.last() != Some(idx) {
                    char_indices.push(*idx);
                }
            }

            let Some((&first, rest)) = char_indices.split_first() else {
                continue;
            };
            let bbox = rest
                .iter()
                .fold(self.chars[first].bbox, |acc, &idx| acc.union(&self.chars[idx].bbox));

            results.push(SearchMatch {
                text: m.as_str().to_string(),
                bbox,
                char_indices,
            });
        }

        results
    }
}
