//! Font loading: glyph widths, code decoding and vertical metrics.
//!
//! Two font families are handled. Simple fonts (Type1, TrueType, Type3)
//! use one byte per code, `/FirstChar` + `/Widths` and a base encoding
//! patched by `/Differences`. Type0 composite fonts are read as two-byte
//! Identity-H codes with widths from the descendant's `/W` and `/DW`.
//! A `/ToUnicode` CMap, when present, wins over the encoding.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};
use tracing::{debug, warn};

use crate::cmap::ToUnicode;
use crate::encoding::{BaseEncoding, SimpleEncoding, glyph_name_to_char};
use crate::error::BackendError;
use crate::lopdf_backend::{number, resolve};
use crate::standard_fonts::{self, StandardFont, strip_subset_prefix};

const DEFAULT_ASCENT: f64 = 750.0;
const DEFAULT_DESCENT: f64 = -250.0;
const REPLACEMENT: &str = "\u{FFFD}";

/// One decoded glyph from a shown string.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub code: u32,
    pub text: String,
    /// Horizontal displacement in glyph space (1/1000 text space units).
    pub width: f64,
    /// Single-byte code 32, which receives word spacing.
    pub is_space: bool,
}

#[derive(Debug)]
enum FontKind {
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing_width: f64,
        standard: Option<&'static StandardFont>,
        encoding: SimpleEncoding,
    },
    Composite {
        default_width: f64,
        widths: HashMap<u32, f64>,
    },
}

/// A font resource ready for text decoding.
#[derive(Debug)]
pub struct Font {
    name: String,
    kind: FontKind,
    to_unicode: Option<ToUnicode>,
    ascent: f64,
    descent: f64,
}

impl Font {
    /// Load a font from its resource dictionary.
    pub fn load(doc: &Document, dict: &Dictionary) -> Result<Font, BackendError> {
        let base_font = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| resolve(doc, o).as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_default();
        let subtype = dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .unwrap_or(b"Type1".as_slice());

        let to_unicode = match dict.get(b"ToUnicode").map(|o| resolve(doc, o)) {
            Ok(Object::Stream(stream)) => {
                let data = if stream.dict.get(b"Filter").is_ok() {
                    stream.decompressed_content().map_err(|e| {
                        BackendError::Font(format!("{base_font}: failed to decompress ToUnicode: {e}"))
                    })?
                } else {
                    stream.content.clone()
                };
                match ToUnicode::parse(&data) {
                    Ok(cmap) => Some(cmap),
                    Err(e) => {
                        warn!(font = %base_font, error = %e, "ignoring unreadable ToUnicode CMap");
                        None
                    }
                }
            }
            _ => None,
        };

        let font = if subtype == b"Type0" {
            load_composite(doc, dict, base_font, to_unicode)?
        } else {
            load_simple(doc, dict, base_font, subtype, to_unicode)
        };
        debug!(font = %font.name, composite = font.is_composite(), "loaded font");
        Ok(font)
    }

    /// A stand-in used when `Tf` names a font the resources do not define.
    pub fn fallback() -> Font {
        let standard = standard_fonts::lookup("Helvetica");
        Font {
            name: "Helvetica".to_string(),
            kind: FontKind::Simple {
                first_char: 0,
                widths: Vec::new(),
                missing_width: 0.0,
                standard,
                encoding: SimpleEncoding::new(BaseEncoding::WinAnsi),
            },
            to_unicode: None,
            ascent: standard.map_or(DEFAULT_ASCENT, |s| s.ascent),
            descent: standard.map_or(DEFAULT_DESCENT, |s| s.descent),
        }
    }

    /// Font name without subset prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, FontKind::Composite { .. })
    }

    /// Ascent in glyph space units.
    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    /// Descent in glyph space units (negative below the baseline).
    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Width of `code` in glyph space units.
    pub fn width(&self, code: u32) -> f64 {
        match &self.kind {
            FontKind::Simple {
                first_char,
                widths,
                missing_width,
                standard,
                ..
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize).copied())
                .or_else(|| {
                    let byte = u8::try_from(code).ok()?;
                    standard.and_then(|s| s.width(byte))
                })
                .unwrap_or(*missing_width),
            FontKind::Composite {
                default_width,
                widths,
            } => widths.get(&code).copied().unwrap_or(*default_width),
        }
    }

    /// Split a shown string into glyphs.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        match &self.kind {
            FontKind::Simple { encoding, .. } => bytes
                .iter()
                .map(|&b| {
                    let code = u32::from(b);
                    let text = self
                        .mapped(code)
                        .or_else(|| encoding.decode(b).map(String::from))
                        .unwrap_or_else(|| REPLACEMENT.to_string());
                    Glyph {
                        code,
                        text,
                        width: self.width(code),
                        is_space: b == b' ',
                    }
                })
                .collect(),
            FontKind::Composite { .. } => bytes
                .chunks_exact(2)
                .map(|pair| {
                    let code = u32::from(u16::from_be_bytes([pair[0], pair[1]]));
                    Glyph {
                        code,
                        text: self
                            .mapped(code)
                            .unwrap_or_else(|| REPLACEMENT.to_string()),
                        width: self.width(code),
                        is_space: false,
                    }
                })
                .collect(),
        }
    }

    fn mapped(&self, code: u32) -> Option<String> {
        self.to_unicode
            .as_ref()
            .and_then(|cmap| cmap.get(code))
            .map(str::to_string)
    }
}

fn load_simple(
    doc: &Document,
    dict: &Dictionary,
    base_font: String,
    subtype: &[u8],
    to_unicode: Option<ToUnicode>,
) -> Font {
    let standard = standard_fonts::lookup(&base_font);
    let first_char = dict
        .get(b"FirstChar")
        .ok()
        .and_then(|o| number(resolve(doc, o)))
        .map_or(0, |n| n.max(0.0) as u32);
    let widths: Vec<f64> = match dict.get(b"Widths").map(|o| resolve(doc, o)) {
        Ok(Object::Array(items)) => items
            .iter()
            .map(|o| number(resolve(doc, o)).unwrap_or(0.0))
            .collect(),
        _ => Vec::new(),
    };
    if widths.is_empty() && standard.is_none() {
        warn!(font = %base_font, "no /Widths and no built-in metrics; glyphs will have zero width");
    }

    let descriptor = font_descriptor(doc, dict);
    let missing_width = descriptor
        .and_then(|d| d.get(b"MissingWidth").ok())
        .and_then(|o| number(resolve(doc, o)))
        .unwrap_or(0.0);
    let (ascent, descent) = vertical_metrics(doc, descriptor, standard);

    let default_base = if subtype == b"TrueType" {
        BaseEncoding::WinAnsi
    } else {
        BaseEncoding::Standard
    };
    let encoding = simple_encoding(doc, dict, default_base, &base_font);

    Font {
        name: strip_subset_prefix(&base_font).to_string(),
        kind: FontKind::Simple {
            first_char,
            widths,
            missing_width,
            standard,
            encoding,
        },
        to_unicode,
        ascent,
        descent,
    }
}

fn load_composite(
    doc: &Document,
    dict: &Dictionary,
    base_font: String,
    to_unicode: Option<ToUnicode>,
) -> Result<Font, BackendError> {
    match dict.get(b"Encoding").and_then(Object::as_name) {
        Ok(b"Identity-H" | b"Identity-V") | Err(_) => {}
        Ok(name) => warn!(
            font = %base_font,
            encoding = %String::from_utf8_lossy(name),
            "unsupported CMap, reading codes as two-byte identity"
        ),
    }

    let descendant = match dict.get(b"DescendantFonts").map(|o| resolve(doc, o)) {
        Ok(Object::Array(items)) => items
            .first()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .ok_or_else(|| BackendError::Font(format!("{base_font}: empty /DescendantFonts")))?,
        _ => {
            return Err(BackendError::Font(format!(
                "{base_font}: Type0 font without /DescendantFonts"
            )));
        }
    };

    let default_width = descendant
        .get(b"DW")
        .ok()
        .and_then(|o| number(resolve(doc, o)))
        .unwrap_or(1000.0);
    let widths = match descendant.get(b"W").map(|o| resolve(doc, o)) {
        Ok(Object::Array(items)) => cid_widths(doc, items),
        _ => HashMap::new(),
    };
    let (ascent, descent) = vertical_metrics(doc, font_descriptor(doc, descendant), None);

    Ok(Font {
        name: strip_subset_prefix(&base_font).to_string(),
        kind: FontKind::Composite {
            default_width,
            widths,
        },
        to_unicode,
        ascent,
        descent,
    })
}

fn font_descriptor<'a>(doc: &'a Document, dict: &'a Dictionary) -> Option<&'a Dictionary> {
    dict.get(b"FontDescriptor")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
}

fn vertical_metrics(
    doc: &Document,
    descriptor: Option<&Dictionary>,
    standard: Option<&StandardFont>,
) -> (f64, f64) {
    let read = |key: &[u8]| {
        descriptor
            .and_then(|d| d.get(key).ok())
            .and_then(|o| number(resolve(doc, o)))
    };
    let ascent = read(b"Ascent")
        .filter(|a| *a > 0.0)
        .or(standard.map(|s| s.ascent))
        .unwrap_or(DEFAULT_ASCENT);
    let descent = read(b"Descent")
        .filter(|d| *d < 0.0)
        .or(standard.map(|s| s.descent))
        .unwrap_or(DEFAULT_DESCENT);
    (ascent, descent)
}

fn simple_encoding(
    doc: &Document,
    dict: &Dictionary,
    default_base: BaseEncoding,
    base_font: &str,
) -> SimpleEncoding {
    let base_from = |name: &[u8]| {
        BaseEncoding::from_name(name).unwrap_or_else(|| {
            debug!(
                font = %base_font,
                encoding = %String::from_utf8_lossy(name),
                "unknown base encoding, using default"
            );
            default_base
        })
    };

    match dict.get(b"Encoding").map(|o| resolve(doc, o)) {
        Ok(Object::Name(name)) => SimpleEncoding::new(base_from(name)),
        Ok(Object::Dictionary(enc)) => {
            let base = enc
                .get(b"BaseEncoding")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map_or(default_base, base_from);
            let mut encoding = SimpleEncoding::new(base);
            if let Ok(Object::Array(items)) = enc.get(b"Differences").map(|o| resolve(doc, o)) {
                encoding.apply_differences(&differences(items));
            }
            encoding
        }
        _ => SimpleEncoding::new(default_base),
    }
}

/// Read a `/Differences` array: a number sets the next code, each name
/// after it takes consecutive codes.
fn differences(items: &[Object]) -> Vec<(u8, char)> {
    let mut out = Vec::new();
    let mut code: Option<u32> = None;
    for item in items {
        match item {
            Object::Integer(n) => code = u32::try_from(*n).ok(),
            Object::Name(name) => {
                if let Some(current) = code {
                    let glyph = String::from_utf8_lossy(name);
                    if let (Ok(byte), Some(ch)) = (u8::try_from(current), glyph_name_to_char(&glyph))
                    {
                        out.push((byte, ch));
                    }
                    code = current.checked_add(1);
                }
            }
            _ => {}
        }
    }
    out
}

/// Read a CIDFont `/W` array: `c [w1 w2 ...]` or `c_first c_last w`.
fn cid_widths(doc: &Document, items: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < items.len() {
        let Some(first) = number(resolve(doc, &items[i])) else {
            i += 1;
            continue;
        };
        let first = first.max(0.0) as u32;
        match items.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    let code = u32::try_from(offset).ok().and_then(|o| first.checked_add(o));
                    let Some(code) = code else {
                        break;
                    };
                    if let Some(w) = number(resolve(doc, w)) {
                        widths.insert(code, w);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let last = number(last).map_or(first, |n| n.max(0.0) as u32);
                if let Some(w) = items.get(i + 2).and_then(|o| number(resolve(doc, o))) {
                    for code in first..=last.min(first.saturating_add(0xFFFF)) {
                        widths.insert(code, w);
                    }
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}
