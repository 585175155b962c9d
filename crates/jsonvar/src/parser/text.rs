//! The UTF-16 parser.
//!
//! Mirrors `bytes.rs` on the other alphabet; the two are kept as twin
//! non-generic implementations so each monomorphises against its own
//! unit type. Grammar notes live in the module docs of [`super`].

use std::sync::Arc;

use super::error::{ParseError, SyntaxError};
use crate::{
    array::Array, cache::StringCache, literals, object::Object, variant::Variant, view::CharView,
};

const QUOTE: u16 = b'"' as u16;
const APOSTROPHE: u16 = b'\'' as u16;
const BACKSLASH: u16 = b'\\' as u16;
const SLASH: u16 = b'/' as u16;
const STAR: u16 = b'*' as u16;
const NEWLINE: u16 = b'\n' as u16;
const CARRIAGE_RETURN: u16 = b'\r' as u16;
const LBRACE: u16 = b'{' as u16;
const RBRACE: u16 = b'}' as u16;
const LBRACKET: u16 = b'[' as u16;
const RBRACKET: u16 = b']' as u16;
const COLON: u16 = b':' as u16;
const COMMA: u16 = b',' as u16;
const BOM: u16 = 0xFEFF;

pub(crate) fn parse(view: CharView, cache: &mut dyn StringCache) -> Result<Variant, ParseError> {
    let mut parser = TextParser {
        reader: Reader::new(view),
        cache,
    };
    parser.document()
}

/// Input view plus a cursor with line and column tracking. End of input
/// reads as a synthetic zero unit, so lookahead never needs a bounds
/// check.
struct Reader {
    view: CharView,
    pos: usize,
    line: usize,
    column: usize,
}

impl Reader {
    fn new(view: CharView) -> Self {
        Self {
            view,
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    #[inline]
    fn peek(&self) -> u16 {
        self.view.unit(self.pos)
    }

    #[inline]
    fn peek_at(&self, ahead: usize) -> u16 {
        self.view.unit(self.pos + ahead)
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.view.len()
    }

    fn bump(&mut self) -> u16 {
        let unit = self.peek();
        self.pos += 1;
        if unit == NEWLINE {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        unit
    }
}

struct TextParser<'a> {
    reader: Reader,
    cache: &'a mut dyn StringCache,
}

impl TextParser<'_> {
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
            return Err(self.fail(SyntaxError::InvalidCharacter(unit_char(self.reader.peek()))));
        }
        Ok(value)
    }

    /// Skips whitespace and comments. Comments are whitespace in this
    /// grammar; an unterminated block comment is a parse error.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let unit = self.reader.peek();
            if is_whitespace(unit) && !self.reader.at_end() {
                self.reader.bump();
            } else if unit == SLASH && self.reader.peek_at(1) == SLASH {
                while !self.reader.at_end() && self.reader.peek() != NEWLINE {
                    self.reader.bump();
                }
            } else if unit == SLASH && self.reader.peek_at(1) == STAR {
                self.reader.bump();
                self.reader.bump();
                loop {
                    if self.reader.at_end() {
                        return Err(self.fail(SyntaxError::UnterminatedComment));
                    }
                    if self.reader.peek() == STAR && self.reader.peek_at(1) == SLASH {
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
            LBRACE => self.object(),
            LBRACKET => self.array(),
            QUOTE | APOSTROPHE => Ok(Variant::from(self.string()?)),
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
            if self.reader.peek() == RBRACE {
                self.reader.bump();
                break;
            }
            let key = self.property_name()?;
            self.skip_trivia()?;
            if self.reader.peek() != COLON {
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
                COMMA => {
                    self.reader.bump();
                }
                RBRACE => {
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
            if self.reader.peek() == RBRACKET {
                self.reader.bump();
                break;
            }
            let value = self.value()?;
            array.add(value);
            self.skip_trivia()?;
            match self.reader.peek() {
                COMMA => {
                    self.reader.bump();
                }
                RBRACKET => {
                    self.reader.bump();
                    break;
                }
                _ => return Err(self.fail(SyntaxError::Expected(','))),
            }
        }
        Ok(Variant::from(array))
    }

    /// A quoted string or a bare token of letters, digits, `+`, `-`,
    /// `.`, `_`.
    fn property_name(&mut self) -> Result<Arc<str>, ParseError> {
        let unit = self.reader.peek();
        if unit == QUOTE || unit == APOSTROPHE {
            return self.string();
        }
        let start = self.reader.pos;
        while is_token_unit(self.reader.peek()) {
            self.reader.bump();
        }
        if self.reader.pos == start {
            return Err(self.fail(SyntaxError::ExpectedPropertyName));
        }
        let view = self.reader.view.slice(start, self.reader.pos - start);
        Ok(self.cache.get_units(&view))
    }

    /// Delimited by `"` or `'`; the opening quote has been peeked, not
    /// consumed.
    ///
    /// The fast path never materialises: it records the slice boundaries
    /// and interns the raw slice. The first backslash drops to the
    /// builder path, which interns the decoded form under the raw,
    /// undecoded slice so a repeated escaped spelling still hits the
    /// cache.
    fn string(&mut self) -> Result<Arc<str>, ParseError> {
        let quote = self.reader.bump();
        let start = self.reader.pos;
        loop {
            if self.reader.at_end() {
                return Err(self.fail(SyntaxError::UnterminatedString));
            }
            let unit = self.reader.peek();
            if unit == quote {
                let raw = self.reader.view.slice(start, self.reader.pos - start);
                self.reader.bump();
                return Ok(self.cache.get_units(&raw));
            }
            if unit == BACKSLASH {
                break;
            }
            self.reader.bump();
        }

        let mut decoded: Vec<u16> = self
            .reader
            .view
            .slice(start, self.reader.pos - start)
            .units()
            .to_vec();
        loop {
            if self.reader.at_end() {
                return Err(self.fail(SyntaxError::UnterminatedString));
            }
            let unit = self.reader.peek();
            if unit == quote {
                let raw = self.reader.view.slice(start, self.reader.pos - start);
                self.reader.bump();
                if let Some(cached) = self.cache.try_get_units(&raw) {
                    return Ok(cached);
                }
                let value: Arc<str> = String::from_utf16_lossy(&decoded).into();
                self.cache.set_units(&raw, Arc::clone(&value));
                return Ok(value);
            }
            if unit != BACKSLASH {
                decoded.push(unit);
                self.reader.bump();
                continue;
            }
            self.reader.bump();
            if self.reader.at_end() {
                return Err(self.fail(SyntaxError::UnterminatedString));
            }
            match self.reader.peek() {
                x if x == b'b' as u16 => {
                    decoded.push(0x08);
                    self.reader.bump();
                }
                x if x == b'f' as u16 => {
                    decoded.push(0x0C);
                    self.reader.bump();
                }
                x if x == b'n' as u16 => {
                    decoded.push(0x0A);
                    self.reader.bump();
                }
                x if x == b'r' as u16 => {
                    decoded.push(0x0D);
                    self.reader.bump();
                }
                x if x == b't' as u16 => {
                    decoded.push(0x09);
                    self.reader.bump();
                }
                x if x == b'u' as u16 => {
                    self.reader.bump();
                    let unit = self.hex_quad()?;
                    decoded.push(unit);
                }
                // A backslash at end of line absorbs the newline: line
                // continuation, CRLF included.
                NEWLINE => {
                    self.reader.bump();
                }
                CARRIAGE_RETURN => {
                    self.reader.bump();
                    if self.reader.peek() == NEWLINE {
                        self.reader.bump();
                    }
                }
                // Everything else escapes to itself, `\"` `\/` `\\`
                // included.
                other => {
                    decoded.push(other);
                    self.reader.bump();
                }
            }
        }
    }

    fn hex_quad(&mut self) -> Result<u16, ParseError> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let unit = self.reader.peek();
            let Some(digit) = hex_value(unit) else {
                return Err(self.fail(SyntaxError::InvalidUnicodeEscape(unit_char(unit))));
            };
            value = (value << 4) | u16::from(digit);
            self.reader.bump();
        }
        Ok(value)
    }

    /// `null`, `true`, `false`, the special floats, or a number. The
    /// integer parser must consume the whole token; otherwise the double
    /// parser takes over and trailing junk inside the token is ignored.
    fn bare_token(&mut self) -> Result<Variant, ParseError> {
        let (line, column) = (self.reader.line, self.reader.column);
        let start = self.reader.pos;
        while is_token_unit(self.reader.peek()) {
            self.reader.bump();
        }
        if self.reader.pos == start {
            return Err(self.fail(SyntaxError::InvalidCharacter(unit_char(self.reader.peek()))));
        }
        let token = self.reader.view.slice(start, self.reader.pos - start);
        let units = token.units();
        if literals::NULL.matches_units(units) {
            return Ok(Variant::new());
        }
        if literals::TRUE.matches_units(units) {
            return Ok(Variant::from(true));
        }
        if literals::FALSE.matches_units(units) {
            return Ok(Variant::from(false));
        }
        if literals::NAN.matches_units(units) {
            return Ok(Variant::from(f64::NAN));
        }
        if literals::INFINITY.matches_units(units) {
            return Ok(Variant::from(f64::INFINITY));
        }
        if literals::NEG_INFINITY.matches_units(units) {
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

fn is_whitespace(unit: u16) -> bool {
    matches!(unit, 0x20 | 0x09 | 0x0D | 0x0A | BOM)
}

fn is_token_unit(unit: u16) -> bool {
    matches!(unit,
        x if (b'a' as u16..=b'z' as u16).contains(&x)
            || (b'A' as u16..=b'Z' as u16).contains(&x)
            || (b'0' as u16..=b'9' as u16).contains(&x)
            || x == b'+' as u16
            || x == b'-' as u16
            || x == b'.' as u16
            || x == b'_' as u16
    )
}

fn hex_value(unit: u16) -> Option<u8> {
    let c = u8::try_from(unit).ok()?;
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn unit_char(unit: u16) -> char {
    char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)
}
