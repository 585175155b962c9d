//! The UTF-8 parser.
//!
//! Twin of `text.rs` on the byte alphabet. The extra work here is
//! `\uXXXX` handling: escapes denote UTF-16 code units, so adjacent
//! surrogate escapes are paired back into one code point before being
//! encoded as UTF-8, and unpaired halves decode to U+FFFD.

use std::sync::Arc;

use super::error::{ParseError, SyntaxError};
use crate::{
    array::Array, cache::StringCache, literals, object::Object, variant::Variant, view::ByteView,
};

pub(crate) fn parse(view: ByteView, cache: &mut dyn StringCache) -> Result<Variant, ParseError> {
    let mut parser = ByteParser {
        reader: Reader::new(view),
        cache,
    };
    parser.document()
}

/// Input view plus a cursor with line and column tracking. End of input
/// reads as a synthetic zero byte, so lookahead never needs a bounds
/// check.
struct Reader {
    view: ByteView,
    pos: usize,
    line: usize,
    column: usize,
}

impl Reader {
    fn new(view: ByteView) -> Self {
        Self {
            view,
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    #[inline]
    fn peek(&self) -> u8 {
        self.view.unit(self.pos)
    }

    #[inline]
    fn peek_at(&self, ahead: usize) -> u8 {
        self.view.unit(self.pos + ahead)
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.view.len()
    }

    fn bump(&mut self) -> u8 {
        let byte = self.peek();
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        byte
    }
}

struct ByteParser<'a> {
    reader: Reader,
    cache: &'a mut dyn StringCache,
}

impl ByteParser<'_> {
    fn fail(&self, kind: SyntaxError) -> ParseError {
        kind.at(self.reader.line, self.reader.column)
    }

    fn document(&mut self) -> Result<Variant, ParseError> {
        self.skip_trivia()?;
        if self.reader.at_end() {
            return Err(self.fail(SyntaxError::UnexpectedEndOfInput));
        }
        let value = self.value()?;
        self.skip_trivia()?;
        if !self.reader.at_end() {
            return Err(self.fail(SyntaxError::InvalidCharacter(char::from(self.reader.peek()))));
        }
        Ok(value)
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let byte = self.reader.peek();
            if is_whitespace(byte) && !self.reader.at_end() {
                self.reader.bump();
            } else if byte == b'/' && self.reader.peek_at(1) == b'/' {
                while !self.reader.at_end() && self.reader.peek() != b'\n' {
                    self.reader.bump();
                }
            } else if byte == b'/' && self.reader.peek_at(1) == b'*' {
                self.reader.bump();
                self.reader.bump();
                loop {
                    if self.reader.at_end() {
                        return Err(self.fail(SyntaxError::UnterminatedComment));
                    }
                    if self.reader.peek() == b'*' && self.reader.peek_at(1) == b'/' {
                        self.reader.bump();
                        self.reader.bump();
                        break;
                    }
                    self.reader.bump();
                }
            } else {
                return Ok(());
            }
        }
    }

    fn value(&mut self) -> Result<Variant, ParseError> {
        match self.reader.peek() {
            b'{' => self.object(),
            b'[' => self.array(),
            b'"' | b'\'' => Ok(Variant::from(self.string()?)),
            _ => self.bare_token(),
        }
    }

    fn object(&mut self) -> Result<Variant, ParseError> {
        self.reader.bump();
        let mut object = Object::new();
        loop {
            self.skip_trivia()?;
            if self.reader.at_end() {
                return Err(self.fail(SyntaxError::Expected('}')));
            }
            if self.reader.peek() == b'}' {
                self.reader.bump();
                break;
            }
            let key = self.property_name()?;
            self.skip_trivia()?;
            if self.reader.peek() != b':' {
                return Err(self.fail(SyntaxError::Expected(':')));
            }
            self.reader.bump();
            self.skip_trivia()?;
            if self.reader.at_end() {
                return Err(self.fail(SyntaxError::UnexpectedEndOfInput));
            }
            let value = self.value()?;
            object.set(key, value);
            self.skip_trivia()?;
            match self.reader.peek() {
                b',' => {
                    self.reader.bump();
                }
                b'}' => {
                    self.reader.bump();
                    break;
                }
                _ => return Err(self.fail(SyntaxError::Expected(','))),
            }
        }
        Ok(Variant::from(object))
    }

    fn array(&mut self) -> Result<Variant, ParseError> {
        self.reader.bump();
        let mut array = Array::new();
        loop {
            self.skip_trivia()?;
            if self.reader.at_end() {
                return Err(self.fail(SyntaxError::Expected(']')));
            }
            if self.reader.peek() == b']' {
                self.reader.bump();
                break;
            }
            let value = self.value()?;
            array.add(value);
            self.skip_trivia()?;
            match self.reader.peek() {
                b',' => {
                    self.reader.bump();
                }
                b']' => {
                    self.reader.bump();
                    break;
                }
                _ => return Err(self.fail(SyntaxError::Expected(','))),
            }
        }
        Ok(Variant::from(array))
    }

    fn property_name(&mut self) -> Result<Arc<str>, ParseError> {
        let byte = self.reader.peek();
        if byte == b'"' || byte == b'\'' {
            return self.string();
        }
        let start = self.reader.pos;
        while is_token_byte(self.reader.peek()) {
            self.reader.bump();
        }
        if self.reader.pos == start {
            return Err(self.fail(SyntaxError::ExpectedPropertyName));
        }
        let view = self.reader.view.slice(start, self.reader.pos - start);
        Ok(self.cache.get_bytes(&view))
    }

    /// Two-phase string scan; see `text.rs`. The builder here works in
    /// UTF-8 directly, with a one-unit surrogate buffer for `\u` pairs.
    fn string(&mut self) -> Result<Arc<str>, ParseError> {
        let quote = self.reader.bump();
        let start = self.reader.pos;
        loop {
            if self.reader.at_end() {
                return Err(self.fail(SyntaxError::UnterminatedString));
            }
            let byte = self.reader.peek();
            if byte == quote {
                let raw = self.reader.view.slice(start, self.reader.pos - start);
                self.reader.bump();
                return Ok(self.cache.get_bytes(&raw));
            }
            if byte == b'\\' {
                break;
            }
            self.reader.bump();
        }

        let mut builder = StringBuilder::new(
            self.reader
                .view
                .slice(start, self.reader.pos - start)
                .bytes()
                .to_vec(),
        );
        loop {
            if self.reader.at_end() {
                return Err(self.fail(SyntaxError::UnterminatedString));
            }
            let byte = self.reader.peek();
            if byte == quote {
                let raw = self.reader.view.slice(start, self.reader.pos - start);
                self.reader.bump();
                if let Some(cached) = self.cache.try_get_bytes(&raw) {
                    return Ok(cached);
                }
                let value: Arc<str> = builder.finish().into();
                self.cache.set_bytes(&raw, Arc::clone(&value));
                return Ok(value);
            }
            if byte != b'\\' {
                builder.push_byte(byte);
                self.reader.bump();
                continue;
            }
            self.reader.bump();
            if self.reader.at_end() {
                return Err(self.fail(SyntaxError::UnterminatedString));
            }
            match self.reader.peek() {
                b'b' => {
                    builder.push_byte(0x08);
                    self.reader.bump();
                }
                b'f' => {
                    builder.push_byte(0x0C);
                    self.reader.bump();
                }
                b'n' => {
                    builder.push_byte(b'\n');
                    self.reader.bump();
                }
                b'r' => {
                    builder.push_byte(b'\r');
                    self.reader.bump();
                }
                b't' => {
                    builder.push_byte(b'\t');
                    self.reader.bump();
                }
                b'u' => {
                    self.reader.bump();
                    let unit = self.hex_quad()?;
                    builder.push_unit(unit);
                }
                // Line continuation: the newline after a backslash is
                // absorbed, CRLF included.
                b'\n' => {
                    self.reader.bump();
                }
                b'\r' => {
                    self.reader.bump();
                    if self.reader.peek() == b'\n' {
                        self.reader.bump();
                    }
                }
                other => {
                    builder.push_byte(other);
                    self.reader.bump();
                }
            }
        }
    }

    fn hex_quad(&mut self) -> Result<u16, ParseError> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let byte = self.reader.peek();
            let Some(digit) = hex_value(byte) else {
                return Err(self.fail(SyntaxError::InvalidUnicodeEscape(char::from(byte))));
            };
            value = (value << 4) | u16::from(digit);
            self.reader.bump();
        }
        Ok(value)
    }

    fn bare_token(&mut self) -> Result<Variant, ParseError> {
        let (line, column) = (self.reader.line, self.reader.column);
        let start = self.reader.pos;
        while is_token_byte(self.reader.peek()) {
            self.reader.bump();
        }
        if self.reader.pos == start {
            return Err(self.fail(SyntaxError::InvalidCharacter(char::from(self.reader.peek()))));
        }
        let token = self.reader.view.slice(start, self.reader.pos - start);
        let bytes = token.bytes();
        if literals::NULL.matches_bytes(bytes) {
            return Ok(Variant::new());
        }
        if literals::TRUE.matches_bytes(bytes) {
            return Ok(Variant::from(true));
        }
        if literals::FALSE.matches_bytes(bytes) {
            return Ok(Variant::from(false));
        }
        if literals::NAN.matches_bytes(bytes) {
            return Ok(Variant::from(f64::NAN));
        }
        if literals::INFINITY.matches_bytes(bytes) {
            return Ok(Variant::from(f64::INFINITY));
        }
        if literals::NEG_INFINITY.matches_bytes(bytes) {
            return Ok(Variant::from(f64::NEG_INFINITY));
        }
        let (integer, consumed) = token.parse_i64();
        if consumed == token.len() && consumed > 0 {
            return Ok(Variant::from(integer));
        }
        let (double, consumed) = token.parse_f64();
        if consumed > 0 {
            return Ok(Variant::from(double));
        }
        Err(SyntaxError::UnexpectedToken(token.to_string_lossy()).at(line, column))
    }
}

/// Accumulates decoded string content as UTF-8, holding back a high
/// surrogate from a `\u` escape until its partner arrives. Raw bytes
/// flush the buffer: an unpaired half decodes to U+FFFD.
struct StringBuilder {
    out: Vec<u8>,
    pending_high: Option<u16>,
}

impl StringBuilder {
    fn new(prefix: Vec<u8>) -> Self {
        Self {
            out: prefix,
            pending_high: None,
        }
    }

    fn push_byte(&mut self, byte: u8) {
        self.flush_pending();
        self.out.push(byte);
    }

    fn push_unit(&mut self, unit: u16) {
        if let Some(high) = self.pending_high.take() {
            if (0xDC00..0xE000).contains(&unit) {
                let combined =
                    0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                self.push_char(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                return;
            }
            self.push_char(char::REPLACEMENT_CHARACTER);
        }
        match unit {
            0xD800..=0xDBFF => self.pending_high = Some(unit),
            0xDC00..=0xDFFF => self.push_char(char::REPLACEMENT_CHARACTER),
            _ => self.push_char(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)),
        }
    }

    fn push_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    fn flush_pending(&mut self) {
        if self.pending_high.take().is_some() {
            self.push_char(char::REPLACEMENT_CHARACTER);
        }
    }

    fn finish(mut self) -> String {
        self.flush_pending();
        match String::from_utf8(self.out) {
            Ok(text) => text,
            // The input bytes were not valid UTF-8; keep what decodes.
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | 0xEF | 0xBB | 0xBF | 0xFE | 0xFF)
}

fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.' | b'_')
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
