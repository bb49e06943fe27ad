//! Highlight annotation output.
//!
//! [`HighlightWriter`] owns the parsed document and attaches one
//! `/Subtype /Highlight` annotation per confirmed occurrence, each with its
//! own appearance stream so viewers that do not synthesize appearances still
//! draw the mark.

use std::collections::HashMap;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use pdfhighlight_core::{AnnotationSink, BBox, Keyword, PdfError};
use pdfhighlight_parse::{LopdfBackend, LopdfDocument, MediaBox, PdfBackend};

/// Colour and opacity of highlight marks.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HighlightStyle {
    /// RGB components in `0.0..=1.0`.
    pub color: [f32; 3],
    pub opacity: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 0.0],
            opacity: 1.0,
        }
    }
}

impl HighlightStyle {
    /// Parse a `RRGGBB` hex colour, with or without a leading `#`.
    pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| f32::from(v) / 255.0)
        };
        Some([channel(0)?, channel(2)?, channel(4)?])
    }
}

/// Writes highlight annotations into an owned document.
pub struct HighlightWriter {
    doc: LopdfDocument,
    style: HighlightStyle,
    pages: HashMap<usize, (ObjectId, MediaBox)>,
    added: usize,
}

impl std::fmt::Debug for HighlightWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightWriter")
            .field("doc", &self.doc)
            .field("style", &self.style)
            .field("added", &self.added)
            .finish_non_exhaustive()
    }
}

impl HighlightWriter {
    pub fn new(doc: LopdfDocument, style: HighlightStyle) -> Self {
        Self {
            doc,
            style,
            pages: HashMap::new(),
            added: 0,
        }
    }

    /// Number of annotations added so far.
    pub fn annotation_count(&self) -> usize {
        self.added
    }

    #[cfg(test)]
    pub(crate) fn document(&self) -> &Document {
        self.doc.inner()
    }

    /// Serialize the annotated document.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IoError`] if lopdf fails to write the file body.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, PdfError> {
        let mut buf = Vec::new();
        self.doc
            .inner_mut()
            .save_to(&mut buf)
            .map_err(|e| PdfError::IoError(format!("failed to serialize PDF: {e}")))?;
        Ok(buf)
    }

    /// Write the annotated document to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::IoError`] if serialization or the write fails.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), PdfError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)
            .map_err(|e| PdfError::IoError(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), annotations = self.added, "saved");
        Ok(())
    }

    fn page_geometry(&mut self, page_index: usize) -> Result<(ObjectId, MediaBox), PdfError> {
        if let Some(geometry) = self.pages.get(&page_index) {
            return Ok(*geometry);
        }
        let page = LopdfBackend::get_page(&self.doc, page_index)?;
        let media_box = LopdfBackend::page_media_box(&self.doc, &page)?;
        self.pages.insert(page_index, (page.object_id, media_box));
        Ok((page.object_id, media_box))
    }
}

impl AnnotationSink for HighlightWriter {
    fn add_highlight(
        &mut self,
        page_index: usize,
        rect: &BBox,
        keyword: &Keyword,
    ) -> Result<(), PdfError> {
        let (page_id, media_box) = self.page_geometry(page_index)?;
        let [x0, y0, x1, y1] = media_box.to_user_space(rect);
        let doc = self.doc.inner_mut();

        let appearance = doc.add_object(appearance_stream(&self.style, [x0, y0, x1, y1]));
        let mut annot = highlight_annotation(&self.style, [x0, y0, x1, y1], keyword.text());
        annot.set("P", page_id);
        annot.set("AP", dictionary! { "N" => appearance });
        let annot_id = doc.add_object(annot);

        append_annotation(doc, page_id, annot_id).map_err(|reason| PdfError::AnnotationError {
            page: page_index,
            reason,
        })?;
        self.added += 1;
        tracing::trace!(page = page_index, keyword = keyword.text(), "highlight added");
        Ok(())
    }
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn color_array(color: [f32; 3]) -> Object {
    Object::Array(color.iter().map(|&c| Object::Real(c)).collect())
}

/// Encode `text` as a PDF text string: PDFDocEncoding-compatible ASCII stays
/// literal, anything else becomes UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn highlight_annotation(
    style: &HighlightStyle,
    [x0, y0, x1, y1]: [f64; 4],
    text: &str,
) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Highlight",
        "Rect" => vec![real(x0), real(y0), real(x1), real(y1)],
        // upper-left, upper-right, lower-left, lower-right
        "QuadPoints" => vec![
            real(x0), real(y1),
            real(x1), real(y1),
            real(x0), real(y0),
            real(x1), real(y0),
        ],
        "C" => color_array(style.color),
        "CA" => Object::Real(style.opacity),
        "F" => 4_i64,
        "Contents" => text_string(text),
    }
}

fn appearance_stream(style: &HighlightStyle, [x0, y0, x1, y1]: [f64; 4]) -> Stream {
    let [r, g, b] = style.color;
    let content = format!(
        "/GS0 gs {r} {g} {b} rg {x0} {y0} {w} {h} re f",
        w = x1 - x0,
        h = y1 - y0,
    );
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "BBox" => vec![real(x0), real(y0), real(x1), real(y1)],
        "Resources" => dictionary! {
            "ExtGState" => dictionary! {
                "GS0" => dictionary! {
                    "Type" => "ExtGState",
                    "BM" => "Multiply",
                    "ca" => Object::Real(style.opacity),
                    "CA" => Object::Real(style.opacity),
                },
            },
        },
    };
    Stream::new(dict, content.into_bytes())
}

/// Push `annot_id` onto the page's `/Annots`, following an indirect array.
fn append_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    annot_id: ObjectId,
) -> Result<(), String> {
    let existing = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| format!("page dictionary unavailable: {e}"))?
        .get(b"Annots")
        .ok()
        .cloned();

    match existing {
        Some(Object::Reference(array_id)) => {
            let array = doc
                .get_object_mut(array_id)
                .and_then(Object::as_array_mut)
                .map_err(|e| format!("/Annots does not point to an array: {e}"))?;
            array.push(annot_id.into());
            Ok(())
        }
        Some(Object::Array(mut array)) => {
            array.push(annot_id.into());
            set_page_entry(doc, page_id, Object::Array(array))
        }
        Some(other) => {
            tracing::warn!(kind = other.enum_variant(), "replacing malformed /Annots");
            set_page_entry(doc, page_id, Object::Array(vec![annot_id.into()]))
        }
        None => set_page_entry(doc, page_id, Object::Array(vec![annot_id.into()])),
    }
}

fn set_page_entry(doc: &mut Document, page_id: ObjectId, annots: Object) -> Result<(), String> {
    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| format!("page dictionary unavailable: {e}"))?;
    page.set("Annots", annots);
    Ok(())
}
