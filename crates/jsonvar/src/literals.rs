//! The six well-known tokens, pre-encoded in both input alphabets.
//!
//! Parsers match bare tokens against these by unit comparison; the
//! emitter and the string coercions reuse the canonical spellings so the
//! special floats round-trip through the lenient grammar.

/// A well-known token with its spelling in each alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    /// Canonical spelling.
    pub text: &'static str,
    /// The spelling as 16-bit code units.
    pub units: &'static [u16],
    /// The spelling as UTF-8 bytes.
    pub bytes: &'static [u8],
}

impl Literal {
    /// Returns `true` if `units` spell this literal exactly.
    #[must_use]
    pub fn matches_units(&self, units: &[u16]) -> bool {
        units == self.units
    }

    /// Returns `true` if `bytes` spell this literal exactly.
    #[must_use]
    pub fn matches_bytes(&self, bytes: &[u8]) -> bool {
        bytes == self.bytes
    }
}

macro_rules! literal {
    ($name:ident, $text:literal, [$($u:literal),+]) => {
        pub const $name: Literal = Literal {
            text: $text,
            units: &[$($u as u16),+],
            bytes: &[$($u as u8),+],
        };
    };
}

literal!(NULL, "null", [b'n', b'u', b'l', b'l']);
literal!(TRUE, "true", [b't', b'r', b'u', b'e']);
literal!(FALSE, "false", [b'f', b'a', b'l', b's', b'e']);
literal!(NAN, "NaN", [b'N', b'a', b'N']);
literal!(
    INFINITY,
    "Infinity",
    [b'I', b'n', b'f', b'i', b'n', b'i', b't', b'y']
);
literal!(
    NEG_INFINITY,
    "-Infinity",
    [b'-', b'I', b'n', b'f', b'i', b'n', b'i', b't', b'y']
);

/// Renders a double using the canonical special spellings for the
/// non-finite values and the platform default decimal form otherwise.
pub(crate) fn float_repr(value: f64) -> String {
    if value.is_nan() {
        NAN.text.to_owned()
    } else if value == f64::INFINITY {
        INFINITY.text.to_owned()
    } else if value == f64::NEG_INFINITY {
        NEG_INFINITY.text.to_owned()
    } else {
        value.to_string()
    }
}
