//! Callback interface between the interpreter and glyph consumers.
//!
//! The interpreter reports every shown glyph as a [`GlyphEvent`] in user
//! space. [`CharCollector`] turns those events into page-space [`Char`]s
//! with a top-left origin.

use pdfhighlight_core::{BBox, Char, Ctm, Point};

use crate::backend::MediaBox;

/// A glyph shown by `Tj`, `TJ`, `'` or `"`.
#[derive(Debug, Clone)]
pub struct GlyphEvent {
    /// Character code in the font's encoding.
    pub code: u32,
    /// Decoded Unicode text.
    pub text: String,
    pub font_name: String,
    pub font_size: f64,
    /// Text rendering matrix (font size, scaling, rise, text matrix and CTM).
    pub trm: Ctm,
    /// Advance width in glyph space units.
    pub width: f64,
    /// Font ascent in glyph space units.
    pub ascent: f64,
    /// Font descent in glyph space units, negative below the baseline.
    pub descent: f64,
}

impl GlyphEvent {
    /// Glyph box in PDF user space as `(x0, y0, x1, y1)`.
    pub fn user_space_box(&self) -> (f64, f64, f64, f64) {
        let corners = [
            Point::new(0.0, self.descent / 1000.0),
            Point::new(self.width / 1000.0, self.descent / 1000.0),
            Point::new(0.0, self.ascent / 1000.0),
            Point::new(self.width / 1000.0, self.ascent / 1000.0),
        ]
        .map(|p| self.trm.transform_point(p));

        corners.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        )
    }

    /// Rendered size: the vertical scale of the rendering matrix.
    pub fn rendered_size(&self) -> f64 {
        self.trm.c.hypot(self.trm.d)
    }
}

/// Receives events from the content stream interpreter.
pub trait ContentHandler {
    fn on_glyph(&mut self, event: GlyphEvent);
}

/// Collects glyphs as page-space [`Char`]s.
#[derive(Debug)]
pub struct CharCollector {
    media_box: MediaBox,
    chars: Vec<Char>,
}

impl CharCollector {
    pub fn new(media_box: MediaBox) -> Self {
        Self {
            media_box,
            chars: Vec::new(),
        }
    }

    pub fn into_chars(self) -> Vec<Char> {
        self.chars
    }
}

impl ContentHandler for CharCollector {
    fn on_glyph(&mut self, event: GlyphEvent) {
        let (x0, y0, x1, y1) = event.user_space_box();
        let bbox = BBox::new(
            x0 - self.media_box.x0,
            self.media_box.y1 - y1,
            x1 - self.media_box.x0,
            self.media_box.y1 - y0,
        );
        self.chars.push(Char {
            size: event.rendered_size(),
            text: event.text,
            bbox,
            fontname: event.font_name,
        });
    }
}
