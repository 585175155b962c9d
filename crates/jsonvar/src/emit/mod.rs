//! The JSON emitter.
//!
//! One recursive writer, generic over the output [`Sink`], walks a
//! [`Variant`] tree under a [`FormatPolicy`]. [`format`] accumulates
//! UTF-16-safe text into a `String`; [`format_bytes`] accumulates UTF-8
//! bytes. Depth is the only cycle defence: a tree deeper than the
//! policy's `max_depth`, cyclic or not, fails with a [`FormatError`]
//! instead of recursing forever.

mod policy;

pub use policy::{FormatPolicy, ReturnPolicy, SpecialFloatPolicy, DEFAULT_MAX_DEPTH};

use thiserror::Error;

use crate::{
    array::Array,
    literals,
    object::Object,
    variant::{Repr, Variant},
};

/// The emitter refused to produce output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("maximum depth {0} exceeded, circular reference suspected")]
    TooDeep(usize),
    #[error("non-finite number rejected by policy")]
    NonFiniteNumber,
}

/// Byte- or text-accumulating output target. Both sinks receive ready
/// UTF-8 fragments; the trait exists so the writer monomorphises per
/// target instead of branching per push.
pub trait Sink {
    fn push_str(&mut self, text: &str);
    fn push_char(&mut self, c: char);
}

impl Sink for String {
    fn push_str(&mut self, text: &str) {
        String::push_str(self, text);
    }

    fn push_char(&mut self, c: char) {
        self.push(c);
    }
}

impl Sink for Vec<u8> {
    fn push_str(&mut self, text: &str) {
        self.extend_from_slice(text.as_bytes());
    }

    fn push_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
}

/// Renders `value` as a string under `policy`.
///
/// # Errors
///
/// Fails when nesting exceeds `policy.max_depth`, or when a non-finite
/// double meets [`SpecialFloatPolicy::Throw`].
pub fn format(value: &Variant, policy: &FormatPolicy) -> Result<String, FormatError> {
    let mut out = String::new();
    Writer {
        out: &mut out,
        policy,
    }
    .value(value, 0)?;
    Ok(out)
}

/// Renders `value` as UTF-8 bytes under `policy`; see [`format`].
///
/// # Errors
///
/// Same conditions as [`format`].
pub fn format_bytes(value: &Variant, policy: &FormatPolicy) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::new();
    Writer {
        out: &mut out,
        policy,
    }
    .value(value, 0)?;
    Ok(out)
}

struct Writer<'a, S: Sink> {
    out: &'a mut S,
    policy: &'a FormatPolicy,
}

impl<S: Sink> Writer<'_, S> {
    fn value(&mut self, value: &Variant, depth: usize) -> Result<(), FormatError> {
        match &*value.repr() {
            Repr::Null => self.out.push_str(literals::NULL.text),
            Repr::Boolean(b) => self.out.push_str(if *b {
                literals::TRUE.text
            } else {
                literals::FALSE.text
            }),
            Repr::Integer(n) => self.out.push_str(&n.to_string()),
            Repr::Float(x) => self.float(*x)?,
            Repr::String(s) => self.string(s),
            Repr::Array(a) => self.array(a, depth)?,
            Repr::Object(o) => self.object(o, depth)?,
        }
        Ok(())
    }

    fn float(&mut self, value: f64) -> Result<(), FormatError> {
        if value.is_finite() {
            self.out.push_str(&value.to_string());
            return Ok(());
        }
        match self.policy.special_float_policy {
            SpecialFloatPolicy::AsString => {
                self.out.push_char('"');
                self.out.push_str(&literals::float_repr(value));
                self.out.push_char('"');
            }
            SpecialFloatPolicy::AsJsLiteral => {
                self.out.push_str(&literals::float_repr(value));
            }
            SpecialFloatPolicy::Throw => return Err(FormatError::NonFiniteNumber),
        }
        Ok(())
    }

    fn string(&mut self, text: &str) {
        self.out.push_char('"');
        for c in text.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\u{8}' => self.out.push_str("\\b"),
                '\t' => self.out.push_str("\\t"),
                '\n' => self.out.push_str("\\n"),
                '\u{c}' => self.out.push_str("\\f"),
                '\r' => self.out.push_str("\\r"),
                c if (c as u32) < 0x20 => self.unicode_escape(c),
                c if self.policy.escape_unicode && (c as u32) >= 0x7F => self.unicode_escape(c),
                c => self.out.push_char(c),
            }
        }
        self.out.push_char('"');
    }

    /// `\uXXXX` per UTF-16 code unit; astral code points become a
    /// surrogate pair of escapes.
    fn unicode_escape(&mut self, c: char) {
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
            self.out.push_str(&std::format!("\\u{unit:04X}"));
        }
    }

    fn array(&mut self, array: &Array, depth: usize) -> Result<(), FormatError> {
        if depth >= self.policy.max_depth {
            return Err(FormatError::TooDeep(self.policy.max_depth));
        }
        let count = array.count();
        let inline = match self.policy.return_policy {
            ReturnPolicy::Never => true,
            ReturnPolicy::Every => false,
            ReturnPolicy::ExceptEmpty => count == 0,
            ReturnPolicy::Simple => count == 0 || array.is_simple(),
        };
        self.out.push_char('[');
        for (i, item) in array.iter().enumerate() {
            if i > 0 {
                self.out.push_char(',');
            }
            if inline {
                if i > 0 {
                    self.out.push_char(' ');
                }
            } else {
                self.newline(depth + 1);
            }
            self.value(&item, depth + 1)?;
        }
        if !inline {
            self.newline(depth);
        }
        self.out.push_char(']');
        Ok(())
    }

    fn object(&mut self, object: &Object, depth: usize) -> Result<(), FormatError> {
        if depth >= self.policy.max_depth {
            return Err(FormatError::TooDeep(self.policy.max_depth));
        }
        let count = object.count();
        let inline = match self.policy.return_policy {
            ReturnPolicy::Never => true,
            ReturnPolicy::Every => false,
            ReturnPolicy::ExceptEmpty => count == 0,
            ReturnPolicy::Simple => count == 0 || object.is_simple(),
        };
        self.out.push_char('{');
        for (i, (key, item)) in object.iter().enumerate() {
            if i > 0 {
                self.out.push_char(',');
            }
            if inline {
                if i > 0 {
                    self.out.push_char(' ');
                }
            } else {
                self.newline(depth + 1);
            }
            self.string(&key);
            self.out.push_str(": ");
            self.value(&item, depth + 1)?;
        }
        if !inline {
            self.newline(depth);
        }
        self.out.push_char('}');
        Ok(())
    }

    fn newline(&mut self, depth: usize) {
        self.out.push_char('\n');
        for _ in 0..depth {
            self.out.push_str(&self.policy.indent);
        }
    }
}
