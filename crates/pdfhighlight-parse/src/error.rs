//! Error types for the parsing and interpreter layers.
//!
//! [`BackendError`] is derived with [`thiserror`] and converts into the core
//! [`PdfError`] at the crate boundary.

use pdfhighlight_core::PdfError;
use thiserror::Error;

/// Error type for PDF parsing backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Font(msg) => PdfError::ParseError(format!("font: {msg}")),
            BackendError::Interpreter(msg) => PdfError::ParseError(format!("content stream: {msg}")),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = BackendError::Parse("invalid xref table".to_string());
        assert_eq!(err.to_string(), "PDF parse error: invalid xref table");
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn interpreter_error_becomes_parse_error() {
        let pdf_err: PdfError = BackendError::Interpreter("unterminated array".to_string()).into();
        assert_eq!(
            pdf_err,
            PdfError::ParseError("content stream: unterminated array".to_string())
        );
    }

    #[test]
    fn core_error_passes_through() {
        let err: BackendError = PdfError::PasswordRequired.into();
        let back: PdfError = err.into();
        assert_eq!(back, PdfError::PasswordRequired);
    }
}
