//! Text state for the content stream interpreter.
//!
//! Tracks the text object (BT/ET), the text and line matrices, and the text
//! parameters set by `Tc Tw Tz TL Tf Tr Ts`. The parameters belong to the
//! graphics state and are saved and restored by `q`/`Q` through
//! [`TextStateSnapshot`]; the matrices are not.

use std::rc::Rc;

use pdfhighlight_core::Ctm;

use crate::font::Font;

/// Text rendering mode (`Tr`).
///
/// Glyphs are reported for every mode, including invisible text, so that
/// OCR text layers can be searched and highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRenderMode {
    #[default]
    Fill,
    Stroke,
    FillStroke,
    Invisible,
    FillClip,
    StrokeClip,
    FillStrokeClip,
    Clip,
}

impl TextRenderMode {
    pub fn from_i64(value: i64) -> Option<Self> {
        Some(match value {
            0 => Self::Fill,
            1 => Self::Stroke,
            2 => Self::FillStroke,
            3 => Self::Invisible,
            4 => Self::FillClip,
            5 => Self::StrokeClip,
            6 => Self::FillStrokeClip,
            7 => Self::Clip,
            _ => return None,
        })
    }
}

/// Text parameters saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
pub struct TextStateSnapshot {
    char_spacing: f64,
    word_spacing: f64,
    h_scaling: f64,
    leading: f64,
    font: Option<Rc<Font>>,
    font_size: f64,
    render_mode: TextRenderMode,
    rise: f64,
}

/// Text state tracked while interpreting a content stream.
#[derive(Debug, Clone)]
pub struct TextState {
    /// Character spacing (`Tc`), unscaled text space units.
    pub char_spacing: f64,
    /// Word spacing (`Tw`), added after single-byte code 32.
    pub word_spacing: f64,
    /// Horizontal scaling (`Tz`) in percent.
    pub h_scaling: f64,
    /// Leading (`TL`) used by `T*`, `'` and `"`.
    pub leading: f64,
    pub font_size: f64,
    pub render_mode: TextRenderMode,
    /// Text rise (`Ts`).
    pub rise: f64,
    font: Option<Rc<Font>>,
    in_text_object: bool,
    text_matrix: Ctm,
    line_matrix: Ctm,
}

impl Default for TextState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextState {
    pub fn new() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_size: 0.0,
            render_mode: TextRenderMode::default(),
            rise: 0.0,
            font: None,
            in_text_object: false,
            text_matrix: Ctm::identity(),
            line_matrix: Ctm::identity(),
        }
    }

    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    pub fn text_matrix(&self) -> &Ctm {
        &self.text_matrix
    }

    pub fn line_matrix(&self) -> &Ctm {
        &self.line_matrix
    }

    /// The current font, if `Tf` has selected one.
    pub fn font(&self) -> Option<&Rc<Font>> {
        self.font.as_ref()
    }

    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn h_scaling_normalized(&self) -> f64 {
        self.h_scaling / 100.0
    }

    /// `BT`: reset both matrices to identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Ctm::identity();
        self.line_matrix = Ctm::identity();
        self.in_text_object = true;
    }

    /// `ET`.
    pub fn end_text(&mut self) {
        self.in_text_object = false;
    }

    /// `Tf`.
    pub fn set_font(&mut self, font: Rc<Font>, size: f64) {
        self.font = Some(font);
        self.font_size = size;
    }

    /// `Td`: start a new line offset from the current line start.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        let translation = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, ty);
        self.line_matrix = translation.concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: like `Td`, and sets the leading to `-ty`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `Tm`: replace both matrices.
    pub fn set_text_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        let m = Ctm::new(a, b, c, d, e, f);
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `T*`: move to the start of the next line.
    pub fn move_to_next_line(&mut self) {
        self.move_text_position(0.0, -self.leading);
    }

    /// Move the text matrix horizontally by `tx` unscaled text space units.
    pub fn advance(&mut self, tx: f64) {
        let translation = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, 0.0);
        self.text_matrix = translation.concat(&self.text_matrix);
    }

    /// Horizontal displacement after showing a glyph of `width` glyph units.
    pub fn glyph_advance(&self, width: f64, is_space: bool) -> f64 {
        let mut tx = width / 1000.0 * self.font_size + self.char_spacing;
        if is_space {
            tx += self.word_spacing;
        }
        tx * self.h_scaling_normalized()
    }

    /// Displacement for a number inside a `TJ` array.
    pub fn adjustment_advance(&self, adjustment: f64) -> f64 {
        -adjustment / 1000.0 * self.font_size * self.h_scaling_normalized()
    }

    /// Text rendering matrix for the current glyph position:
    /// `[Tfs*Th 0 0 Tfs 0 Trise] × Tm × CTM`.
    pub fn rendering_matrix(&self, ctm: &Ctm) -> Ctm {
        let params = Ctm::new(
            self.font_size * self.h_scaling_normalized(),
            0.0,
            0.0,
            self.font_size,
            0.0,
            self.rise,
        );
        params.concat(&self.text_matrix).concat(ctm)
    }

    pub fn snapshot(&self) -> TextStateSnapshot {
        TextStateSnapshot {
            char_spacing: self.char_spacing,
            word_spacing: self.word_spacing,
            h_scaling: self.h_scaling,
            leading: self.leading,
            font: self.font.clone(),
            font_size: self.font_size,
            render_mode: self.render_mode,
            rise: self.rise,
        }
    }

    pub fn restore(&mut self, snapshot: TextStateSnapshot) {
        self.char_spacing = snapshot.char_spacing;
        self.word_spacing = snapshot.word_spacing;
        self.h_scaling = snapshot.h_scaling;
        self.leading = snapshot.leading;
        self.font = snapshot.font;
        self.font_size = snapshot.font_size;
        self.render_mode = snapshot.render_mode;
        self.rise = snapshot.rise;
    }
}
