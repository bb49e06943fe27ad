//! Content stream tokenizer.
//!
//! Turns raw content stream bytes into [`Operator`]s, each carrying the
//! [`Operand`]s that preceded it. Comments are dropped and inline images
//! (`BI ... ID ... EI`) are skipped whole, since their data can contain any
//! byte sequence.

use crate::error::BackendError;

/// A content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer or real number.
    Number(f64),
    /// Name without the leading `/`, with `#xx` escapes decoded.
    Name(String),
    /// Literal or hexadecimal string, as raw bytes.
    Str(Vec<u8>),
    Array(Vec<Operand>),
    Dict(Vec<(String, Operand)>),
    Bool(bool),
    Null,
}

impl Operand {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// An operator with its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub name: String,
    pub operands: Vec<Operand>,
}

impl Operator {
    /// Numeric operand at `index`.
    pub fn number(&self, index: usize) -> Option<f64> {
        self.operands.get(index).and_then(Operand::as_f64)
    }

    /// The first `N` operands as numbers, if they all are.
    pub fn numbers<const N: usize>(&self) -> Option<[f64; N]> {
        let mut out = [0.0; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.number(i)?;
        }
        Some(out)
    }
}

/// Parse content stream bytes into operators.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] for unterminated strings, arrays,
/// dictionaries or inline images.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operator>, BackendError> {
    let mut lexer = Lexer { input, pos: 0 };
    let mut ops = Vec::new();
    let mut stack: Vec<Operand> = Vec::new();

    while let Some(token) = lexer.next_token()? {
        match token {
            Token::Operand(operand) => stack.push(operand),
            Token::Keyword(name) if name == "BI" => {
                lexer.skip_inline_image()?;
                stack.clear();
            }
            Token::Keyword(name) => ops.push(Operator {
                name,
                operands: std::mem::take(&mut stack),
            }),
            Token::Close(_) => {}
        }
    }

    Ok(ops)
}

enum Token {
    Operand(Operand),
    Keyword(String),
    /// A closing `]` or `>>`, only meaningful inside a container.
    Close(u8),
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl Lexer<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self.peek().is_some_and(|b| b != b'\n' && b != b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, BackendError> {
        loop {
            self.skip_whitespace_and_comments();
            let Some(b) = self.peek() else {
                return Ok(None);
            };

            let token = match b {
                b'(' => Token::Operand(Operand::Str(self.literal_string()?)),
                b'<' if self.peek_at(1) == Some(b'<') => {
                    self.pos += 2;
                    Token::Operand(Operand::Dict(self.dictionary()?))
                }
                b'<' => Token::Operand(Operand::Str(self.hex_string()?)),
                b'>' if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    Token::Close(b'>')
                }
                b'[' => {
                    self.pos += 1;
                    Token::Operand(Operand::Array(self.array()?))
                }
                b']' => {
                    self.pos += 1;
                    Token::Close(b']')
                }
                b'/' => Token::Operand(Operand::Name(self.name())),
                b'0'..=b'9' | b'+' | b'-' | b'.' => Token::Operand(self.number()),
                _ if is_regular(b) => match self.keyword().as_str() {
                    "true" => Token::Operand(Operand::Bool(true)),
                    "false" => Token::Operand(Operand::Bool(false)),
                    "null" => Token::Operand(Operand::Null),
                    other => Token::Keyword(other.to_string()),
                },
                _ => {
                    // stray delimiter such as `)`, `{` or a lone `>`
                    self.pos += 1;
                    continue;
                }
            };
            return Ok(Some(token));
        }
    }

    /// Next value inside an array or dictionary. Bare keywords read as names.
    fn value(&mut self, container: &str) -> Result<Result<Operand, u8>, BackendError> {
        match self.next_token()? {
            Some(Token::Operand(operand)) => Ok(Ok(operand)),
            Some(Token::Keyword(name)) => Ok(Ok(Operand::Name(name))),
            Some(Token::Close(c)) => Ok(Err(c)),
            None => Err(BackendError::Interpreter(format!("unterminated {container}"))),
        }
    }

    fn array(&mut self) -> Result<Vec<Operand>, BackendError> {
        let mut items = Vec::new();
        loop {
            match self.value("array")? {
                Ok(operand) => items.push(operand),
                Err(b']') => return Ok(items),
                Err(_) => {}
            }
        }
    }

    fn dictionary(&mut self) -> Result<Vec<(String, Operand)>, BackendError> {
        let mut entries = Vec::new();
        loop {
            let key = match self.value("dictionary")? {
                Ok(Operand::Name(key)) => key,
                Ok(_) => {
                    return Err(BackendError::Interpreter(
                        "expected name key in dictionary".to_string(),
                    ));
                }
                Err(b'>') => return Ok(entries),
                Err(_) => continue,
            };
            match self.value("dictionary")? {
                Ok(value) => entries.push((key, value)),
                Err(b'>') => return Ok(entries),
                Err(_) => {}
            }
        }
    }

    fn literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut out = Vec::new();
        let mut depth = 1u32;

        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => self.escape(&mut out),
                _ => out.push(b),
            }
        }

        Err(BackendError::Interpreter(
            "unterminated literal string".to_string(),
        ))
    }

    /// Decode the escape following a backslash.
    fn escape(&mut self, out: &mut Vec<u8>) {
        let Some(b) = self.peek() else {
            return;
        };
        self.pos += 1;
        match b {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'\r' => {
                // line continuation, CR or CRLF
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push((value & 0xFF) as u8);
            }
            other => out.push(other),
        }
    }

    fn hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut out = Vec::new();
        let mut high: Option<u8> = None;

        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'>' {
                if let Some(h) = high {
                    out.push(h << 4);
                }
                return Ok(out);
            }
            let Some(v) = hex_value(b) else {
                continue;
            };
            match high.take() {
                Some(h) => out.push((h << 4) | v),
                None => high = Some(v),
            }
        }

        Err(BackendError::Interpreter(
            "unterminated hex string".to_string(),
        ))
    }

    fn name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }

        let raw = &self.input[start..self.pos];
        let mut bytes = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Some(h), Some(l)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    bytes.push((h << 4) | l);
                    i += 3;
                    continue;
                }
            }
            bytes.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Malformed numbers such as a lone `-` read as zero.
    fn number(&mut self) -> Operand {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut seen_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !seen_dot => {
                    seen_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }

        let text = std::str::from_utf8(&self.input[start..self.pos]).unwrap_or("0");
        let value = match text.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                tracing::debug!(token = text, "malformed number in content stream");
                0.0
            }
        };
        Operand::Number(value)
    }

    fn keyword(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_regular) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Skip from after `BI` to just past the matching `EI`.
    fn skip_inline_image(&mut self) -> Result<(), BackendError> {
        loop {
            match self.next_token()? {
                Some(Token::Keyword(k)) if k == "ID" => break,
                Some(_) => {}
                None => {
                    return Err(BackendError::Interpreter(
                        "unterminated inline image (missing ID)".to_string(),
                    ));
                }
            }
        }

        let data_start = self.pos;
        while self.pos + 1 < self.input.len() {
            let preceded = self.pos == data_start || is_whitespace(self.input[self.pos - 1]);
            let followed = self
                .input
                .get(self.pos + 2)
                .is_none_or(|&b| is_whitespace(b) || is_delimiter(b));
            if preceded && followed && &self.input[self.pos..self.pos + 2] == b"EI" {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }

        Err(BackendError::Interpreter(
            "unterminated inline image (missing EI)".to_string(),
        ))
    }
}
