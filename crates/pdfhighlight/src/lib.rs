//! pdfhighlight: Find keywords in PDF documents and highlight them.
//!
//! This is the public API facade. It re-exports the matching types from
//! pdfhighlight-core, reads documents through pdfhighlight-parse and writes
//! the result back as standard PDF highlight annotations.
//!
//! # Architecture
//!
//! - **pdfhighlight-core**: normalization, presence patterns, positioned
//!   search and boundary confirmation
//! - **pdfhighlight-parse**: lopdf backend and content stream interpreter
//! - **pdfhighlight** (this crate): [`Pdf`], [`Page`], [`HighlightWriter`] and
//!   the [`highlight_file`] / [`highlight_bytes`] entry points
//!
//! # Example
//!
//! ```ignore
//! use pdfhighlight::{HighlightConfig, Keyword, KeywordList, highlight_file};
//!
//! let keywords: KeywordList = [Keyword::exact("Reto"), Keyword::partial("Metodo")]
//!     .into_iter()
//!     .collect();
//! let report = highlight_file("informe.pdf", "informe_highlighted.pdf", keywords,
//!     &HighlightConfig::default())?;
//! for missing in &report.unmatched {
//!     println!("not found: {missing}");
//! }
//! ```

mod highlight;
mod page;
mod pdf;
#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod test_pdf;
mod writer;

pub use highlight::{
    HighlightConfig, annotate, annotate_with_progress, highlight_bytes, highlight_file,
};
pub use page::Page;
pub use pdf::{PagesIter, Pdf};
pub use writer::{HighlightStyle, HighlightWriter};

pub use pdfhighlight_core::{
    BBox, Char, HighlightOptions, HighlightReport, Highlighter, Keyword, KeywordList,
    KeywordStats, MatchMode, PatternError, PdfError, SearchMatch, UnmatchedSet, Word,
    WordOptions,
};
pub use pdfhighlight_parse::ExtractOptions;

pub use pdfhighlight_core;
pub use pdfhighlight_parse;
