//! pdfhighlight-core: Backend-independent keyword matching for PDF pages.
//!
//! This crate provides the data types (BBox, Char, Word, Keyword) and the
//! algorithms (text folding, presence patterns, positioned search, boundary
//! confirmation) used by pdfhighlight. It knows nothing about PDF syntax:
//! pages come in through [`PageText`] and highlights go out through
//! [`AnnotationSink`].

pub mod error;
pub mod geometry;
pub mod keyword;
pub mod matcher;
pub mod normalize;
pub mod options;
pub mod pattern;
pub mod report;
pub mod search;
pub mod text;
pub mod unmatched;
pub mod words;

pub use error::{PatternError, PdfError};
pub use geometry::{BBox, Ctm, Margins, Point};
pub use keyword::{Keyword, KeywordList, MatchMode};
pub use matcher::{
    AnnotationSink, Highlighter, MatchRegion, PageMatches, PageSource, PageText,
    confirm_occurrence, token_confirms,
};
pub use normalize::{PUNCTUATION, normalize, strip_trailing_punctuation};
pub use options::HighlightOptions;
pub use pattern::PresencePattern;
pub use report::{HighlightReport, KeywordStats};
pub use search::{PageTextIndex, SearchMatch};
pub use text::Char;
pub use unmatched::UnmatchedSet;
pub use words::{Word, WordExtractor, WordOptions, words_in_region};
