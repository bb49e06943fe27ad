//! Text-only content stream interpreter.
//!
//! Walks the operators of a page (and of the Form XObjects it paints),
//! maintaining the CTM and the text state, and reports every shown glyph to
//! a [`ContentHandler`]. Path, colour and image operators are ignored.

use std::collections::HashMap;
use std::rc::Rc;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdfhighlight_core::Ctm;
use tracing::{debug, trace, warn};

use crate::backend::ExtractOptions;
use crate::error::BackendError;
use crate::font::Font;
use crate::handler::{ContentHandler, GlyphEvent};
use crate::lopdf_backend::{decode_stream, number, resolve};
use crate::text_state::{TextRenderMode, TextState, TextStateSnapshot};
use crate::tokenizer::{Operand, Operator, tokenize};

/// Graphics state tracked by the interpreter: the CTM plus the `q`/`Q` stack.
#[derive(Debug, Default)]
pub struct GraphicsState {
    ctm: Ctm,
    stack: Vec<(Ctm, TextStateSnapshot)>,
}

impl GraphicsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctm(&self) -> &Ctm {
        &self.ctm
    }

    /// `cm`: prepend `m` to the CTM.
    pub fn concat_matrix(&mut self, m: &Ctm) {
        self.ctm = m.concat(&self.ctm);
    }

    pub fn save(&mut self, text: TextStateSnapshot) {
        self.stack.push((self.ctm, text));
    }

    /// Pop the last saved state; `None` on an unbalanced `Q`.
    pub fn restore(&mut self) -> Option<TextStateSnapshot> {
        let (ctm, text) = self.stack.pop()?;
        self.ctm = ctm;
        Some(text)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Fonts loaded during one page, keyed by object id.
#[derive(Debug, Default)]
pub struct FontCache {
    fonts: HashMap<ObjectId, Rc<Font>>,
}

impl FontCache {
    fn get(&mut self, doc: &Document, resources: &Dictionary, name: &str) -> Rc<Font> {
        let entry = resources
            .get(b"Font")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .and_then(|fonts| fonts.get(name.as_bytes()).ok());

        let Some(entry) = entry else {
            warn!(font = name, "font not found in resources, using Helvetica metrics");
            return Rc::new(Font::fallback());
        };

        let id = entry.as_reference().ok();
        if let Some(font) = id.and_then(|id| self.fonts.get(&id)) {
            return Rc::clone(font);
        }

        let font = match resolve(doc, entry).as_dict() {
            Ok(dict) => Font::load(doc, dict).unwrap_or_else(|e| {
                warn!(font = name, error = %e, "failed to load font, using Helvetica metrics");
                Font::fallback()
            }),
            Err(_) => {
                warn!(font = name, "font resource is not a dictionary");
                Font::fallback()
            }
        };
        let font = Rc::new(font);
        if let Some(id) = id {
            self.fonts.insert(id, Rc::clone(&font));
        }
        font
    }
}

/// Interpret `content` with `resources`, reporting glyphs to `handler`.
///
/// `depth` counts Form XObject nesting; exceeding
/// [`ExtractOptions::max_recursion_depth`] is an error.
#[allow(clippy::too_many_arguments)]
pub fn interpret_content_stream(
    doc: &Document,
    content: &[u8],
    resources: &Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut GraphicsState,
    tstate: &mut TextState,
    fonts: &mut FontCache,
) -> Result<(), BackendError> {
    if depth > options.max_recursion_depth {
        return Err(BackendError::Interpreter(format!(
            "Form XObject nesting depth {depth} exceeds limit {}",
            options.max_recursion_depth
        )));
    }

    let mut run = Run {
        doc,
        resources,
        handler,
        options,
        depth,
        gstate,
        tstate,
        fonts,
    };
    for op in tokenize(content)? {
        run.apply(&op)?;
    }
    Ok(())
}

struct Run<'a, 'h> {
    doc: &'a Document,
    resources: &'a Dictionary,
    handler: &'h mut dyn ContentHandler,
    options: &'a ExtractOptions,
    depth: usize,
    gstate: &'h mut GraphicsState,
    tstate: &'h mut TextState,
    fonts: &'h mut FontCache,
}

impl Run<'_, '_> {
    fn apply(&mut self, op: &Operator) -> Result<(), BackendError> {
        let ts = &mut *self.tstate;
        match op.name.as_str() {
            "q" => self.gstate.save(ts.snapshot()),
            "Q" => match self.gstate.restore() {
                Some(snapshot) => ts.restore(snapshot),
                None => trace!("unbalanced Q ignored"),
            },
            "cm" => {
                if let Some([a, b, c, d, e, f]) = op.numbers::<6>() {
                    self.gstate.concat_matrix(&Ctm::new(a, b, c, d, e, f));
                }
            }

            "BT" => ts.begin_text(),
            "ET" => ts.end_text(),

            "Tc" => ts.char_spacing = number_or_zero(op, 0),
            "Tw" => ts.word_spacing = number_or_zero(op, 0),
            "Tz" => ts.h_scaling = op.number(0).unwrap_or(100.0),
            "TL" => ts.leading = number_or_zero(op, 0),
            "Ts" => ts.rise = number_or_zero(op, 0),
            "Tr" => {
                if let Some(mode) = op.number(0).and_then(|n| TextRenderMode::from_i64(n as i64)) {
                    ts.render_mode = mode;
                }
            }
            "Tf" => {
                let name = op.operands.first().and_then(Operand::as_name).unwrap_or("");
                let size = number_or_zero(op, 1);
                let font = self.fonts.get(self.doc, self.resources, name);
                self.tstate.set_font(font, size);
            }

            "Td" => {
                if let Some([tx, ty]) = op.numbers::<2>() {
                    ts.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = op.numbers::<2>() {
                    ts.move_text_position_and_set_leading(tx, ty);
                }
            }
            "Tm" => {
                if let Some([a, b, c, d, e, f]) = op.numbers::<6>() {
                    ts.set_text_matrix(a, b, c, d, e, f);
                }
            }
            "T*" => ts.move_to_next_line(),

            "Tj" => {
                if let Some(bytes) = op.operands.first().and_then(Operand::as_bytes) {
                    self.show(bytes);
                }
            }
            "'" => {
                ts.move_to_next_line();
                if let Some(bytes) = op.operands.first().and_then(Operand::as_bytes) {
                    self.show(bytes);
                }
            }
            "\"" => {
                ts.word_spacing = number_or_zero(op, 0);
                ts.char_spacing = number_or_zero(op, 1);
                ts.move_to_next_line();
                if let Some(bytes) = op.operands.get(2).and_then(Operand::as_bytes) {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Operand::Array(items)) = op.operands.first() {
                    for item in items {
                        match item {
                            Operand::Str(bytes) => self.show(bytes),
                            Operand::Number(adj) => {
                                let tx = self.tstate.adjustment_advance(*adj);
                                self.tstate.advance(tx);
                            }
                            _ => {}
                        }
                    }
                }
            }

            "Do" => {
                if let Some(name) = op.operands.first().and_then(Operand::as_name) {
                    self.paint_xobject(name)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Report each glyph of `bytes` and advance the text matrix past it.
    fn show(&mut self, bytes: &[u8]) {
        let font = match self.tstate.font() {
            Some(font) => Rc::clone(font),
            None => {
                debug!("text shown before Tf, using Helvetica metrics");
                let font = Rc::new(Font::fallback());
                self.tstate.set_font(Rc::clone(&font), self.tstate.font_size);
                font
            }
        };

        for glyph in font.decode(bytes) {
            let trm = self.tstate.rendering_matrix(self.gstate.ctm());
            let advance = self.tstate.glyph_advance(glyph.width, glyph.is_space);
            self.handler.on_glyph(GlyphEvent {
                code: glyph.code,
                text: glyph.text,
                font_name: font.name().to_string(),
                font_size: self.tstate.font_size,
                trm,
                width: glyph.width,
                ascent: font.ascent(),
                descent: font.descent(),
            });
            self.tstate.advance(advance);
        }
    }

    fn paint_xobject(&mut self, name: &str) -> Result<(), BackendError> {
        let stream = self
            .resources
            .get(b"XObject")
            .ok()
            .and_then(|o| resolve(self.doc, o).as_dict().ok())
            .and_then(|xobjects| xobjects.get(name.as_bytes()).ok())
            .and_then(|o| resolve(self.doc, o).as_stream().ok());
        let Some(stream) = stream else {
            debug!(xobject = name, "XObject not found in resources");
            return Ok(());
        };
        let is_form = stream
            .dict
            .get(b"Subtype")
            .and_then(Object::as_name)
            .is_ok_and(|s| s == b"Form");
        if !is_form {
            return Ok(());
        }
        if self.depth + 1 > self.options.max_recursion_depth {
            warn!(
                xobject = name,
                limit = self.options.max_recursion_depth,
                "Form XObject nesting too deep, skipped"
            );
            return Ok(());
        }
        self.paint_form(name, stream)
    }

    fn paint_form(&mut self, name: &str, stream: &Stream) -> Result<(), BackendError> {
        let content = decode_stream(stream).map_err(|e| {
            BackendError::Interpreter(format!("failed to decode Form XObject /{name}: {e}"))
        })?;
        let resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|o| resolve(self.doc, o).as_dict().ok())
            .unwrap_or(self.resources);

        self.gstate.save(self.tstate.snapshot());
        if let Some(m) = form_matrix(stream) {
            self.gstate.concat_matrix(&m);
        }
        let result = interpret_content_stream(
            self.doc,
            &content,
            resources,
            &mut *self.handler,
            self.options,
            self.depth + 1,
            &mut *self.gstate,
            &mut *self.tstate,
            &mut *self.fonts,
        );
        if let Some(snapshot) = self.gstate.restore() {
            self.tstate.restore(snapshot);
        }
        result
    }
}

fn number_or_zero(op: &Operator, index: usize) -> f64 {
    op.number(index).unwrap_or(0.0)
}

fn form_matrix(stream: &Stream) -> Option<Ctm> {
    let items = stream.dict.get(b"Matrix").ok()?.as_array().ok()?;
    match items.iter().map(number).collect::<Option<Vec<f64>>>()?.as_slice() {
        &[a, b, c, d, e, f] => Some(Ctm::new(a, b, c, d, e, f)),
        _ => None,
    }
}
