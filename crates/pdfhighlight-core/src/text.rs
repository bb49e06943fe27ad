use crate::geometry::BBox;

/// A single character glyph extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// The text content of this character (usually one code point; ligatures may map to more).
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
    /// Font name with any subset prefix removed.
    pub fontname: String,
    /// Font size in points.
    pub size: f64,
}

impl Char {
    /// Returns `true` if the glyph renders only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}
