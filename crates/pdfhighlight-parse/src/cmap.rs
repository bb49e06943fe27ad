//! ToUnicode CMap parsing.
//!
//! A ToUnicode stream is PostScript, but the parts that matter
//! (`beginbfchar`/`endbfchar` and `beginbfrange`/`endbfrange` blocks) are
//! plain operand sequences, so the content stream tokenizer reads them fine:
//! every `endbfchar` operator carries the pairs of its block as operands.

use std::collections::HashMap;

use crate::error::BackendError;
use crate::tokenizer::{Operand, tokenize};

/// Character code to Unicode text mapping from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicode {
    map: HashMap<u32, String>,
}

impl ToUnicode {
    /// Parse the decoded bytes of a ToUnicode stream.
    ///
    /// Malformed entries are skipped; only tokenizer failures are errors.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let mut map = HashMap::new();

        for op in tokenize(data)? {
            match op.name.as_str() {
                "endbfchar" => {
                    for pair in op.operands.chunks_exact(2) {
                        let (Some(src), Some(dst)) = (pair[0].as_bytes(), pair[1].as_bytes())
                        else {
                            continue;
                        };
                        map.insert(code_of(src), decode_utf16be(dst));
                    }
                }
                "endbfrange" => {
                    for triple in op.operands.chunks_exact(3) {
                        insert_range(&mut map, triple);
                    }
                }
                _ => {}
            }
        }

        Ok(ToUnicode { map })
    }

    pub fn get(&self, code: u32) -> Option<&str> {
        self.map.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Ranges wider than this are treated as corrupt.
const MAX_RANGE: u32 = 0xFFFF;

fn insert_range(map: &mut HashMap<u32, String>, triple: &[Operand]) {
    let (Some(lo), Some(hi)) = (triple[0].as_bytes(), triple[1].as_bytes()) else {
        return;
    };
    let (lo, hi) = (code_of(lo), code_of(hi));
    if hi < lo || hi - lo > MAX_RANGE {
        return;
    }

    match &triple[2] {
        // <lo> <hi> <dst>: consecutive codes get consecutive last code units
        Operand::Str(dst) => {
            let mut units = utf16_units(dst);
            let Some(&last) = units.last() else {
                return;
            };
            for (offset, code) in (lo..=hi).enumerate() {
                if let Some(slot) = units.last_mut() {
                    *slot = last.wrapping_add(offset as u16);
                }
                map.insert(code, String::from_utf16_lossy(&units));
            }
        }
        // <lo> <hi> [<dst0> <dst1> ...]
        Operand::Array(items) => {
            for (code, item) in (lo..=hi).zip(items) {
                if let Some(dst) = item.as_bytes() {
                    map.insert(code, decode_utf16be(dst));
                }
            }
        }
        _ => {}
    }
}

/// Big-endian code value of a source string.
fn code_of(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|c| match c {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [single] => u16::from(*single),
            _ => 0,
        })
        .collect()
}

fn decode_utf16be(bytes: &[u8]) -> String {
    String::from_utf16_lossy(&utf16_units(bytes))
}
