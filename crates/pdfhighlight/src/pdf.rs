//! Top-level PDF document type for opening and reading pages.

use std::path::Path;

use pdfhighlight_core::{PageSource, PdfError, WordOptions};
use pdfhighlight_parse::{BackendError, ExtractOptions, LopdfBackend, LopdfDocument, PdfBackend};

use crate::Page;

/// Iterator over pages of a PDF document, extracting each page on demand.
pub struct PagesIter<'a> {
    pdf: &'a Pdf,
    current: usize,
    count: usize,
}

impl Iterator for PagesIter<'_> {
    type Item = Result<Page, PdfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.count {
            return None;
        }
        let result = self.pdf.page(self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PagesIter<'_> {}

/// A PDF document opened for keyword search.
///
/// # Example
///
/// ```ignore
/// let pdf = Pdf::open_file("informe.pdf", None)?;
/// let page = pdf.page(0)?;
/// for m in page.search("Reto", false) {
///     println!("{:?}", m.bbox);
/// }
/// ```
pub struct Pdf {
    doc: LopdfDocument,
    options: ExtractOptions,
    word_options: WordOptions,
}

impl std::fmt::Debug for Pdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdf")
            .field("doc", &self.doc)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Pdf {
    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::SourceUnreadable`] if the file cannot be read or
    /// does not hold a PDF, and [`PdfError::PasswordRequired`] if it is
    /// encrypted.
    pub fn open_file(
        path: impl AsRef<Path>,
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let bytes = std::fs::read(path)
            .map_err(|e| PdfError::source_unreadable(source.as_str(), e.to_string()))?;
        Self::open_named(&bytes, &source, options)
    }

    /// Open a PDF document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::SourceUnreadable`] if the bytes are not a PDF and
    /// [`PdfError::PasswordRequired`] if the document is encrypted.
    pub fn open(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Self, PdfError> {
        Self::open_named(bytes, "<memory>", options)
    }

    fn open_named(
        bytes: &[u8],
        source: &str,
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let doc = LopdfBackend::open(bytes).map_err(|e| match e {
            BackendError::Core(core) => core,
            other => PdfError::source_unreadable(source, other.to_string()),
        })?;
        tracing::debug!(source, pages = LopdfBackend::page_count(&doc), "opened document");
        Ok(Self {
            doc,
            options: options.unwrap_or_default(),
            word_options: WordOptions::default(),
        })
    }

    /// Use `options` when grouping glyphs into words and lines.
    pub fn with_word_options(mut self, options: WordOptions) -> Self {
        self.word_options = options;
        self
    }

    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    pub fn pages_iter(&self) -> PagesIter<'_> {
        PagesIter {
            pdf: self,
            current: 0,
            count: self.page_count(),
        }
    }

    /// Access a page by 0-based index, extracting its glyphs.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the index is out of range or the page content
    /// cannot be interpreted.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        let page = LopdfBackend::get_page(&self.doc, index)?;
        let media_box = LopdfBackend::page_media_box(&self.doc, &page)?;
        let chars = LopdfBackend::extract_chars(&self.doc, &page, &self.options)?;
        tracing::trace!(page = index, chars = chars.len(), "extracted page");
        Ok(Page::new(
            index,
            media_box.width(),
            media_box.height(),
            chars,
            &self.word_options,
        ))
    }

    pub(crate) fn into_document(self) -> LopdfDocument {
        self.doc
    }
}

impl PageSource for Pdf {
    type Page = Page;

    fn page_count(&self) -> usize {
        Pdf::page_count(self)
    }

    fn page(&self, index: usize) -> Result<Page, PdfError> {
        Pdf::page(self, index)
    }
}
