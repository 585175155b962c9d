//! The lenient JSON parsers.
//!
//! Two implementations share one grammar and differ only in the input
//! alphabet: [`parse_units`] walks 16-bit code units, [`parse_bytes`]
//! walks raw UTF-8 (and [`parse_str`] is its safe front door). Both
//! produce a [`Variant`] tree and intern every key and string payload
//! through a [`StringCache`].
//!
//! On top of strict JSON the grammar accepts:
//!
//! - `//` line comments and `/* */` block comments as whitespace, along
//!   with byte-order marks;
//! - single-quoted strings (`'x'`), closed by the quote that opened
//!   them;
//! - unquoted object keys made of ASCII letters, digits, `+`, `-`, `.`,
//!   `_`;
//! - a trailing `,` immediately before `]` or `}`;
//! - `NaN`, `Infinity`, and `-Infinity` tokens, a leading `+`, and
//!   leading zeros on numbers;
//! - escape leniency: any escaped character without a defined meaning
//!   decodes to itself, and a backslash at end of line absorbs the line
//!   break.
//!
//! Anything else malformed is a [`ParseError`] carrying the 1-based line
//! and 0-based column of the failure.

mod bytes;
mod error;
mod text;

pub use error::{ParseError, SyntaxError};

use crate::{
    cache::{StringCache, TempStringCache},
    variant::Variant,
    view::{ByteView, CharView},
};

/// Parses UTF-8 text with a fresh temporary string cache.
///
/// # Examples
///
/// ```
/// let v = jsonvar::parse_str("{a: 1, b: [1, 2,], c: 'x'}").unwrap();
/// assert_eq!(v.get("b").at(1).as_long(), 2);
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the failure position.
pub fn parse_str(input: &str) -> Result<Variant, ParseError> {
    let mut cache = TempStringCache::new();
    parse_str_with(input, &mut cache)
}

/// Parses UTF-8 text against a caller-supplied cache, typically a
/// [`SharedStringCache`](crate::SharedStringCache) reused across parses.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the failure position.
pub fn parse_str_with(input: &str, cache: &mut dyn StringCache) -> Result<Variant, ParseError> {
    bytes::parse(ByteView::from(input), cache)
}

/// Parses raw UTF-8 bytes with a fresh temporary string cache. Invalid
/// UTF-8 inside string content decodes lossily rather than failing.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the failure position.
pub fn parse_bytes(input: &[u8]) -> Result<Variant, ParseError> {
    let mut cache = TempStringCache::new();
    parse_bytes_with(input, &mut cache)
}

/// Parses raw UTF-8 bytes against a caller-supplied cache.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the failure position.
pub fn parse_bytes_with(input: &[u8], cache: &mut dyn StringCache) -> Result<Variant, ParseError> {
    bytes::parse(ByteView::from(input), cache)
}

/// Parses 16-bit code units with a fresh temporary string cache.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the failure position.
pub fn parse_units(units: &[u16]) -> Result<Variant, ParseError> {
    let mut cache = TempStringCache::new();
    parse_units_with(units, &mut cache)
}

/// Parses 16-bit code units against a caller-supplied cache.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the failure position.
pub fn parse_units_with(units: &[u16], cache: &mut dyn StringCache) -> Result<Variant, ParseError> {
    text::parse(CharView::from(units), cache)
}
