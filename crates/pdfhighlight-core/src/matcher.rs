//! Keyword matching and highlight placement.
//!
//! Each page is checked twice per keyword. The presence pattern runs over
//! the folded page text and decides whether the keyword counts as found.
//! Independently, the keyword's original spelling is searched among the
//! rendered glyphs, and each located rectangle becomes a highlight once
//! boundary confirmation accepts it.

use crate::error::{PatternError, PdfError};
use crate::geometry::{BBox, Margins};
use crate::keyword::{Keyword, KeywordList, MatchMode};
use crate::normalize::{normalize, strip_trailing_punctuation};
use crate::options::HighlightOptions;
use crate::pattern::PresencePattern;
use crate::report::{HighlightReport, KeywordStats};
use crate::unmatched::UnmatchedSet;
use crate::words::Word;

/// Plain text and glyph geometry of one page.
pub trait PageText {
    /// Full rendered text of the page in reading order.
    fn plain_text(&self) -> &str;

    /// Bounding boxes of every rendered occurrence of `literal`, in
    /// top-left page coordinates.
    fn find_text_rectangles(&self, literal: &str, case_sensitive: bool) -> Vec<BBox>;

    /// Whitespace-delimited words whose boxes overlap `region`.
    fn words_in_region(&self, region: &BBox) -> Vec<Word>;
}

/// Receiver of highlight marks.
pub trait AnnotationSink {
    /// Mark `rect` on page `page_index` (0-based) as a highlight of `keyword`.
    ///
    /// Overlapping rectangles are marked independently.
    fn add_highlight(
        &mut self,
        page_index: usize,
        rect: &BBox,
        keyword: &Keyword,
    ) -> Result<(), PdfError>;
}

/// A document as a sequence of pages.
pub trait PageSource {
    type Page: PageText;

    fn page_count(&self) -> usize;

    fn page(&self, index: usize) -> Result<Self::Page, PdfError>;
}

/// A rectangle to highlight for one keyword.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchRegion {
    /// Position of the keyword in the highlighter's keyword list.
    pub keyword_index: usize,
    pub bbox: BBox,
}

/// Everything decided about one page, before anything is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMatches {
    pub page_index: usize,
    /// Keywords not present in this page's text.
    pub unmatched: UnmatchedSet,
    /// Rendered occurrences located per keyword, indexed like the keyword list.
    pub located: Vec<usize>,
    /// Confirmed regions in keyword order, then occurrence order.
    pub regions: Vec<MatchRegion>,
}

impl PageMatches {
    /// Whether the keyword at `index` occurs in this page's text.
    pub fn is_present(&self, index: usize) -> bool {
        index < self.located.len() && !self.unmatched.contains_index(index)
    }
}

/// Whether a word taken from the page is the keyword itself.
///
/// One trailing punctuation character is ignored, so `"Reto."` and `"Reto,"`
/// confirm the keyword `Reto`.
pub fn token_confirms(token: &str, normalized_keyword: &str) -> bool {
    normalize(strip_trailing_punctuation(token)) == normalized_keyword
}

/// Decide whether a located occurrence of `keyword` should be highlighted.
///
/// Partial keywords are always confirmed. For exact keywords the occurrence
/// rectangle is grown by `margins` and the words overlapping it are checked
/// with [`token_confirms`]; the first confirming word settles it.
pub fn confirm_occurrence<P: PageText + ?Sized>(
    page: &P,
    keyword: &Keyword,
    rect: &BBox,
    margins: &Margins,
) -> bool {
    match keyword.mode() {
        MatchMode::Partial => true,
        MatchMode::Exact => page
            .words_in_region(&rect.expand(margins))
            .iter()
            .any(|word| token_confirms(&word.text, keyword.normalized())),
    }
}

/// Matches a keyword list against pages and places highlights.
#[derive(Debug, Clone)]
pub struct Highlighter {
    keywords: KeywordList,
    patterns: Vec<Option<PresencePattern>>,
    malformed: Vec<PatternError>,
    options: HighlightOptions,
}

impl Highlighter {
    /// Compile the presence pattern of every keyword.
    ///
    /// A keyword whose pattern fails to compile is kept in the list but never
    /// matched: it stays unmatched and is listed in
    /// [`HighlightReport::malformed`].
    pub fn new(keywords: KeywordList, options: HighlightOptions) -> Self {
        let mut malformed = Vec::new();
        let patterns = keywords
            .iter()
            .map(
                |kw| match PresencePattern::compile(kw, options.pattern_size_limit) {
                    Ok(pattern) => Some(pattern),
                    Err(err) => {
                        tracing::warn!(keyword = kw.text(), reason = %err.reason, "skipping keyword");
                        malformed.push(err);
                        None
                    }
                },
            )
            .collect();

        Self {
            keywords,
            patterns,
            malformed,
            options,
        }
    }

    pub fn keywords(&self) -> &KeywordList {
        &self.keywords
    }

    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    pub fn malformed(&self) -> &[PatternError] {
        &self.malformed
    }

    /// Decide presence and highlight regions for one page without drawing.
    pub fn match_page<P: PageText + ?Sized>(&self, page_index: usize, page: &P) -> PageMatches {
        let normalized = normalize(page.plain_text());
        let mut unmatched = UnmatchedSet::new(&self.keywords);
        let mut located = vec![0; self.keywords.len()];
        let mut regions = Vec::new();

        for (index, (keyword, pattern)) in self.keywords.iter().zip(&self.patterns).enumerate() {
            let Some(pattern) = pattern else {
                continue;
            };

            if pattern.is_present_in(&normalized) {
                unmatched.remove(index);
            }

            let rects =
                page.find_text_rectangles(keyword.text(), self.options.case_sensitive_search);
            located[index] = rects.len();
            for rect in rects {
                if confirm_occurrence(page, keyword, &rect, &self.options.boundary_margins) {
                    regions.push(MatchRegion {
                        keyword_index: index,
                        bbox: rect,
                    });
                } else {
                    tracing::trace!(
                        page = page_index,
                        keyword = keyword.text(),
                        "occurrence rejected by boundary check"
                    );
                }
            }
        }

        PageMatches {
            page_index,
            unmatched,
            located,
            regions,
        }
    }

    /// Process every page of `source` in order and draw into `sink`.
    ///
    /// # Errors
    ///
    /// Stops at the first page that cannot be read or the first highlight the
    /// sink rejects.
    pub fn run<S, K>(&self, source: &S, sink: &mut K) -> Result<HighlightReport, PdfError>
    where
        S: PageSource + ?Sized,
        K: AnnotationSink + ?Sized,
    {
        let pages = (0..source.page_count())
            .map(|index| source.page(index).map(|page| self.match_page(index, &page)));
        self.apply(pages, sink)
    }

    /// Draw already matched pages into `sink` and build the report.
    ///
    /// Pages are applied in iteration order. Presence is merged across pages
    /// so a keyword found on any page leaves the unmatched set.
    pub fn apply<I, K>(&self, pages: I, sink: &mut K) -> Result<HighlightReport, PdfError>
    where
        I: IntoIterator<Item = Result<PageMatches, PdfError>>,
        K: AnnotationSink + ?Sized,
    {
        let mut unmatched = UnmatchedSet::new(&self.keywords);
        let mut stats: Vec<KeywordStats> = self
            .keywords
            .iter()
            .map(|kw| KeywordStats::new(kw.text(), kw.mode()))
            .collect();
        let mut page_count = 0;

        for page in pages {
            let page = page?;
            let _span = tracing::debug_span!("page", index = page.page_index).entered();

            for region in &page.regions {
                let Some(keyword) = self.keywords.get(region.keyword_index) else {
                    continue;
                };
                sink.add_highlight(page.page_index, &region.bbox, keyword)?;
                stats[region.keyword_index].highlights += 1;
            }

            for (index, entry) in stats.iter_mut().enumerate() {
                entry.occurrences += page.located.get(index).copied().unwrap_or(0);
                if page.is_present(index) {
                    entry.pages_present.push(page.page_index);
                }
            }

            unmatched.merge(&page.unmatched);
            tracing::debug!(
                regions = page.regions.len(),
                remaining = unmatched.len(),
                "page processed"
            );
            page_count += 1;
        }

        Ok(HighlightReport {
            page_count,
            unmatched: unmatched.into_vec(),
            malformed: self.malformed.clone(),
            keywords: stats,
        })
    }
}
