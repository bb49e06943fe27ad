//! PDF parsing backend trait.
//!
//! [`PdfBackend`] abstracts the operations the highlighter needs from a PDF
//! reader: open a document, address its pages, read the MediaBox and run the
//! content stream interpreter over a page.

use pdfhighlight_core::{BBox, Char, PdfError};

use crate::handler::{CharCollector, ContentHandler};

/// Options for content stream interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtractOptions {
    /// Maximum Form XObject nesting depth.
    pub max_recursion_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 10,
        }
    }
}

/// A page MediaBox in PDF user space (bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl MediaBox {
    /// Build a box from two corners in any order.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Convert a top-left origin page box back into user space
    /// `[x0, y0, x1, y1]`.
    pub fn to_user_space(&self, bbox: &BBox) -> [f64; 4] {
        [
            bbox.x0 + self.x0,
            self.y1 - bbox.bottom,
            bbox.x1 + self.x0,
            self.y1 - bbox.top,
        ]
    }
}

/// Trait abstracting PDF parsing operations.
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// let page = MyBackend::get_page(&doc, 0)?;
/// let chars = MyBackend::extract_chars(&doc, &page, &ExtractOptions::default())?;
/// ```
pub trait PdfBackend {
    type Document;
    type Page;
    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable PDF, or if the
    /// document is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// The page MediaBox, inherited from the page tree when the page has none.
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<MediaBox, Self::Error>;

    /// Run the content stream interpreter over a page.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error>;

    /// All glyphs of a page in content stream order, in top-left page space.
    fn extract_chars(
        doc: &Self::Document,
        page: &Self::Page,
        options: &ExtractOptions,
    ) -> Result<Vec<Char>, Self::Error> {
        let mut collector = CharCollector::new(Self::page_media_box(doc, page)?);
        Self::interpret_page(doc, page, &mut collector, options)?;
        Ok(collector.into_chars())
    }
}
