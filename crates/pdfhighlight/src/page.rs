//! Page type: glyphs, reading-order text and words of one PDF page.

use pdfhighlight_core::{
    BBox, Char, PageText, PageTextIndex, SearchMatch, Word, WordExtractor, WordOptions,
    words_in_region,
};

/// A single page from a PDF document.
///
/// Holds the page's glyphs together with the derived plain text and word
/// boxes, so repeated searches do not re-run extraction.
#[derive(Debug, Clone)]
pub struct Page {
    page_number: usize,
    width: f64,
    height: f64,
    index: PageTextIndex,
    words: Vec<Word>,
}

impl Page {
    /// Build a page from its glyphs in content stream order.
    pub fn new(
        page_number: usize,
        width: f64,
        height: f64,
        chars: Vec<Char>,
        options: &WordOptions,
    ) -> Self {
        let words = WordExtractor::extract(&chars, options);
        Self {
            page_number,
            width,
            height,
            index: PageTextIndex::new(chars, options),
            words,
        }
    }

    /// Returns the page index (0-based).
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn chars(&self) -> &[Char] {
        self.index.chars()
    }

    /// Plain text with spaces between words and newlines between lines.
    pub fn extract_text(&self) -> &str {
        self.index.text()
    }

    pub fn extract_words(&self) -> &[Word] {
        &self.words
    }

    /// Every rendered occurrence of `literal` with its bounding box.
    pub fn search(&self, literal: &str, case_sensitive: bool) -> Vec<SearchMatch> {
        self.index.find(literal, case_sensitive)
    }
}

impl PageText for Page {
    fn plain_text(&self) -> &str {
        self.extract_text()
    }

    fn find_text_rectangles(&self, literal: &str, case_sensitive: bool) -> Vec<BBox> {
        self.search(literal, case_sensitive)
            .into_iter()
            .map(|m| m.bbox)
            .collect()
    }

    fn words_in_region(&self, region: &BBox) -> Vec<Word> {
        words_in_region(&self.words, region)
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(text: &str, x: f64, top: f64) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let x0 = x + i as f64 * 6.0;
                Char {
                    text: c.to_string(),
                    bbox: BBox::new(x0, top, x0 + 6.0, top + 12.0),
                    fontname: "Helvetica".to_string(),
                    size: 12.0,
                }
            })
            .collect()
    }

    fn page(lines: &[&str]) -> Page {
        let chars = lines
            .iter()
            .enumerate()
            .flat_map(|(row, line)| glyphs(line, 72.0, 60.0 + row as f64 * 14.0))
            .collect();
        Page::new(0, 612.0, 792.0, chars, &WordOptions::default())
    }

    #[test]
    fn text_and_words() {
        let p = page(&["el Reto.", "del plan"]);
        assert_eq!(p.extract_text(), "el Reto.\ndel plan");
        let words: Vec<&str> = p.extract_words().iter().map(|w| w.text.as_str()).collect();
        assert_eq!(words, vec!["el", "Reto.", "del", "plan"]);
        assert_eq!(p.chars().len(), 16);
        assert_eq!(p.width(), 612.0);
    }

    #[test]
    fn rectangles_and_region_words() {
        let p = page(&["el Reto."]);
        let rects = p.find_text_rectangles("Reto", true);
        assert_eq!(rects, vec![BBox::new(90.0, 60.0, 114.0, 72.0)]);
        let words = p.words_in_region(&rects[0]);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "Reto.");
    }

    #[test]
    fn search_case_sensitivity() {
        let p = page(&["ODS y ods"]);
        assert_eq!(p.search("ods", false).len(), 2);
        assert_eq!(p.search("ods", true).len(), 1);
    }
}
