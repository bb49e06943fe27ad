//! lopdf-based PDF parsing backend.
//!
//! Implements [`PdfBackend`] on top of [`lopdf::Document`].

use std::sync::LazyLock;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdfhighlight_core::PdfError;
use tracing::debug;

use crate::backend::{ExtractOptions, MediaBox, PdfBackend};
use crate::error::BackendError;
use crate::handler::ContentHandler;
use crate::interpreter::{FontCache, GraphicsState, interpret_content_stream};
use crate::text_state::TextState;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: Document,
    /// Page object ids in page order.
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Mutable access for writers that add objects (annotations) to the file.
    pub fn inner_mut(&mut self) -> &mut Document {
        &mut self.inner
    }

    pub fn into_inner(self) -> Document {
        self.inner
    }

    /// Object id of the page at `index`.
    pub fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.page_ids.get(index).copied()
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    pub object_id: ObjectId,
    /// 0-based page index.
    pub index: usize,
}

/// The lopdf-based backend.
pub struct LopdfBackend;

/// Follow an indirect reference; anything else is returned as is.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Numeric value of an Integer or Real object.
pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

/// Stream content, decompressed when a filter is present.
pub(crate) fn decode_stream(stream: &Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// Look up `key` on the page, then up the page tree through `/Parent`.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current = page_id;
    // guards against /Parent cycles
    for _ in 0..64 {
        let dict = doc
            .get_object(current)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(resolve(doc, value)));
        }
        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = parent,
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree /Parent chain too deep".to_string()))
}

fn page_content_bytes(doc: &Document, page: &Dictionary) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };
    match resolve(doc, contents) {
        Object::Stream(stream) => decode_stream(stream),
        Object::Array(parts) => {
            let mut content = Vec::new();
            for part in parts {
                let stream = resolve(doc, part).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                if !content.is_empty() {
                    content.push(b'\n');
                }
                content.extend(decode_stream(stream)?);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

fn page_resources(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, BackendError> {
    static EMPTY: LazyLock<Dictionary> = LazyLock::new(Dictionary::new);
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => obj
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(&EMPTY),
    }
}

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(PdfError::PasswordRequired));
        }

        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();
        debug!(pages = page_ids.len(), "opened PDF");
        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        let object_id = doc.page_id(index).ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            ))
        })?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<MediaBox, Self::Error> {
        let obj = resolve_inherited(&doc.inner, page.object_id, b"MediaBox")?
            .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
        let array = obj
            .as_array()
            .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
        let values: Vec<f64> = array
            .iter()
            .map(|o| number(resolve(&doc.inner, o)))
            .collect::<Option<_>>()
            .ok_or_else(|| BackendError::Parse("MediaBox holds a non-number".to_string()))?;
        match values.as_slice() {
            &[x0, y0, x1, y1] => Ok(MediaBox::new(x0, y0, x1, y1)),
            other => Err(BackendError::Parse(format!(
                "expected 4-element MediaBox, got {}",
                other.len()
            ))),
        }
    }

    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error> {
        let inner = &doc.inner;
        let page_dict = inner
            .get_object(page.object_id)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        let content = page_content_bytes(inner, page_dict)?;
        let resources = page_resources(inner, page.object_id)?;

        interpret_content_stream(
            inner,
            &content,
            resources,
            handler,
            options,
            0,
            &mut GraphicsState::new(),
            &mut TextState::new(),
            &mut FontCache::default(),
        )
    }
}

#[cfg(test)]
#[path = "../../pdfhighlight/tests/common/mod.rs"]
mod test_pdf;
