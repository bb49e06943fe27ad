//! Single-byte font encodings and glyph-name resolution.

use unicode_normalization::UnicodeNormalization;

/// A predefined base encoding for simple fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseEncoding {
    /// Windows code page 1252.
    WinAnsi,
    /// Adobe StandardEncoding, the implicit base of Type1 fonts.
    Standard,
}

impl BaseEncoding {
    /// Recognize an `/Encoding` or `/BaseEncoding` name.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"WinAnsiEncoding" => Some(BaseEncoding::WinAnsi),
            b"StandardEncoding" => Some(BaseEncoding::Standard),
            _ => None,
        }
    }

    pub fn decode(self, code: u8) -> Option<char> {
        match self {
            BaseEncoding::WinAnsi => win_ansi(code),
            BaseEncoding::Standard => standard(code),
        }
    }
}

/// Code-to-character table of a simple font.
#[derive(Debug, Clone)]
pub struct SimpleEncoding {
    table: [Option<char>; 256],
}

impl SimpleEncoding {
    pub fn new(base: BaseEncoding) -> Self {
        let mut table = [None; 256];
        for (code, slot) in table.iter_mut().enumerate() {
            *slot = base.decode(code as u8);
        }
        Self { table }
    }

    /// Override codes from a `/Differences` array.
    pub fn apply_differences(&mut self, differences: &[(u8, char)]) {
        for &(code, ch) in differences {
            self.table[code as usize] = Some(ch);
        }
    }

    pub fn decode(&self, code: u8) -> Option<char> {
        self.table[code as usize]
    }
}

fn win_ansi(code: u8) -> Option<char> {
    #[rustfmt::skip]
    const HIGH: [Option<char>; 32] = [
        Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
        Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
        Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
        Some('\u{0152}'), None, Some('\u{017D}'), None,
        None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
        Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
        Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
        Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
    ];
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(char::from(code)),
        0x80..=0x9F => HIGH[(code - 0x80) as usize],
        _ => None,
    }
}

fn standard(code: u8) -> Option<char> {
    let c = match code {
        0x27 => '\u{2019}',
        0x60 => '\u{2018}',
        0x20..=0x7E => char::from(code),
        0xA1 => '¡',
        0xA2 => '¢',
        0xA3 => '£',
        0xA4 => '\u{2044}',
        0xA5 => '¥',
        0xA6 => '\u{0192}',
        0xA7 => '§',
        0xA8 => '¤',
        0xA9 => '\'',
        0xAA => '\u{201C}',
        0xAB => '«',
        0xAC => '\u{2039}',
        0xAD => '\u{203A}',
        0xAE => '\u{FB01}',
        0xAF => '\u{FB02}',
        0xB1 => '\u{2013}',
        0xB2 => '\u{2020}',
        0xB3 => '\u{2021}',
        0xB4 => '·',
        0xB6 => '¶',
        0xB7 => '\u{2022}',
        0xB8 => '\u{201A}',
        0xB9 => '\u{201E}',
        0xBA => '\u{201D}',
        0xBB => '»',
        0xBC => '\u{2026}',
        0xBD => '\u{2030}',
        0xBF => '¿',
        0xC1 => '`',
        0xC2 => '´',
        0xC3 => '\u{02C6}',
        0xC4 => '\u{02DC}',
        0xC5 => '¯',
        0xC6 => '\u{02D8}',
        0xC7 => '\u{02D9}',
        0xC8 => '¨',
        0xCA => '\u{02DA}',
        0xCB => '¸',
        0xCD => '\u{02DD}',
        0xCE => '\u{02DB}',
        0xCF => '\u{02C7}',
        0xD0 => '\u{2014}',
        0xE1 => 'Æ',
        0xE3 => 'ª',
        0xE8 => '\u{0141}',
        0xE9 => 'Ø',
        0xEA => '\u{0152}',
        0xEB => 'º',
        0xF1 => 'æ',
        0xF5 => '\u{0131}',
        0xF8 => '\u{0142}',
        0xF9 => 'ø',
        0xFA => '\u{0153}',
        0xFB => 'ß',
        _ => return None,
    };
    Some(c)
}

static GLYPH_NAMES: &[(&str, char)] = &[
    ("space", ' '),
    ("nbspace", '\u{00A0}'),
    ("exclam", '!'),
    ("quotedbl", '"'),
    ("numbersign", '#'),
    ("dollar", '$'),
    ("percent", '%'),
    ("ampersand", '&'),
    ("quotesingle", '\''),
    ("parenleft", '('),
    ("parenright", ')'),
    ("asterisk", '*'),
    ("plus", '+'),
    ("comma", ','),
    ("hyphen", '-'),
    ("minus", '\u{2212}'),
    ("period", '.'),
    ("slash", '/'),
    ("zero", '0'),
    ("one", '1'),
    ("two", '2'),
    ("three", '3'),
    ("four", '4'),
    ("five", '5'),
    ("six", '6'),
    ("seven", '7'),
    ("eight", '8'),
    ("nine", '9'),
    ("colon", ':'),
    ("semicolon", ';'),
    ("less", '<'),
    ("equal", '='),
    ("greater", '>'),
    ("question", '?'),
    ("at", '@'),
    ("bracketleft", '['),
    ("backslash", '\\'),
    ("bracketright", ']'),
    ("asciicircum", '^'),
    ("underscore", '_'),
    ("grave", '`'),
    ("braceleft", '{'),
    ("bar", '|'),
    ("braceright", '}'),
    ("asciitilde", '~'),
    ("exclamdown", '¡'),
    ("questiondown", '¿'),
    ("quoteleft", '\u{2018}'),
    ("quoteright", '\u{2019}'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("quotesinglbase", '\u{201A}'),
    ("quotedblbase", '\u{201E}'),
    ("guillemotleft", '«'),
    ("guillemotright", '»'),
    ("guilsinglleft", '\u{2039}'),
    ("guilsinglright", '\u{203A}'),
    ("endash", '\u{2013}'),
    ("emdash", '\u{2014}'),
    ("bullet", '\u{2022}'),
    ("ellipsis", '\u{2026}'),
    ("periodcentered", '·'),
    ("degree", '°'),
    ("section", '§'),
    ("paragraph", '¶'),
    ("copyright", '©'),
    ("registered", '®'),
    ("trademark", '\u{2122}'),
    ("Euro", '\u{20AC}'),
    ("sterling", '£'),
    ("yen", '¥'),
    ("cent", '¢'),
    ("ordfeminine", 'ª'),
    ("ordmasculine", 'º'),
    ("acute", '´'),
    ("dieresis", '¨'),
    ("cedilla", '¸'),
    ("circumflex", '\u{02C6}'),
    ("tilde", '\u{02DC}'),
    ("ring", '\u{02DA}'),
    ("caron", '\u{02C7}'),
    ("fi", '\u{FB01}'),
    ("fl", '\u{FB02}'),
    ("germandbls", 'ß'),
    ("AE", 'Æ'),
    ("ae", 'æ'),
    ("OE", '\u{0152}'),
    ("oe", '\u{0153}'),
    ("Oslash", 'Ø'),
    ("oslash", 'ø'),
    ("eth", 'ð'),
    ("Eth", 'Ð'),
    ("thorn", 'þ'),
    ("Thorn", 'Þ'),
    ("dotlessi", '\u{0131}'),
];

/// Accent suffixes of composite glyph names and their combining marks.
const ACCENT_SUFFIXES: &[(&str, char)] = &[
    ("acute", '\u{0301}'),
    ("grave", '\u{0300}'),
    ("circumflex", '\u{0302}'),
    ("tilde", '\u{0303}'),
    ("dieresis", '\u{0308}'),
    ("ring", '\u{030A}'),
    ("cedilla", '\u{0327}'),
    ("caron", '\u{030C}'),
];

/// Resolve a PostScript glyph name to a character.
///
/// Handles single-letter names, `uniXXXX` and `uXXXX[XX]` forms, a table of
/// common names, and accented Latin letters named `<letter><accent>` such as
/// `aacute` or `Ntilde`.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    let name = name.split('.').next().unwrap_or(name);

    if let [b] = name.as_bytes() {
        if b.is_ascii_alphabetic() {
            return Some(char::from(*b));
        }
    }

    if let Some(&(_, c)) = GLYPH_NAMES.iter().find(|(n, _)| *n == name) {
        return Some(c);
    }

    if let Some(hex) = name.strip_prefix("uni") {
        return hex
            .get(..4)
            .and_then(|h| u32::from_str_radix(h, 16).ok())
            .and_then(char::from_u32);
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            if let Ok(v) = u32::from_str_radix(hex, 16) {
                return char::from_u32(v);
            }
        }
    }

    compose_accented(name)
}

fn compose_accented(name: &str) -> Option<char> {
    let mut chars = name.chars();
    let base = chars.next().filter(char::is_ascii_alphabetic)?;
    let rest = chars.as_str();
    let (_, mark) = ACCENT_SUFFIXES.iter().find(|(suffix, _)| *suffix == rest)?;

    let mut composed = [base, *mark].into_iter().nfc();
    match (composed.next(), composed.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
