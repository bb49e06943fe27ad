//! pdfhighlight-parse: PDF reading and text positioning.
//!
//! Opens documents with lopdf, walks page content streams and reports every
//! shown glyph with its page-space bounding box. Only what keyword search
//! needs is interpreted: text state, the CTM, fonts and Form XObjects.

pub mod backend;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font;
pub mod handler;
pub mod interpreter;
pub mod lopdf_backend;
pub mod standard_fonts;
pub mod text_state;
pub mod tokenizer;

pub use backend::{ExtractOptions, MediaBox, PdfBackend};
pub use error::BackendError;
pub use handler::{CharCollector, ContentHandler, GlyphEvent};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use pdfhighlight_core;
