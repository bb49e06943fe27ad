//! Error types for pdfhighlight.
//!
//! Provides [`PdfError`] for structural failures that abort a whole run and
//! [`PatternError`] for a keyword whose presence pattern cannot be built,
//! which only removes that keyword from matching.

use std::fmt;

/// Fatal error types for PDF highlighting.
///
/// Any of these stops processing of the document; no partially annotated
/// output is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// The input document is missing, unreadable, or not a PDF.
    SourceUnreadable {
        /// Where the document was expected (a path, or `"<memory>"`).
        source: String,
        /// Why it could not be opened.
        reason: String,
    },
    /// Error parsing PDF structure or syntax after the document was opened.
    ParseError(String),
    /// I/O error reading or writing PDF data.
    IoError(String),
    /// A highlight annotation could not be attached to a page.
    AnnotationError {
        /// Page index (0-based).
        page: usize,
        /// What went wrong.
        reason: String,
    },
    /// The PDF is encrypted and requires a password to open.
    PasswordRequired,
    /// Any other error not covered by specific variants.
    Other(String),
}

impl PdfError {
    pub fn source_unreadable(source: impl Into<String>, reason: impl Into<String>) -> Self {
        PdfError::SourceUnreadable {
            source: source.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::SourceUnreadable { source, reason } => {
                write!(f, "source not found or unreadable: {source}: {reason}")
            }
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::AnnotationError { page, reason } => {
                write!(f, "failed to annotate page {}: {reason}", page + 1)
            }
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// A keyword whose presence pattern failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternError {
    /// The keyword as supplied.
    pub keyword: String,
    /// The compiler's explanation.
    pub reason: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "keyword '{}' does not form a valid search pattern: {}",
            self.keyword, self.reason
        )
    }
}

impl std::error::Error for PatternError {}
