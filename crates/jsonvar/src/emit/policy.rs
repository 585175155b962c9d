/// Depth bound used by the preset policies and the conversion context.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Whitespace regime for the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnPolicy {
    /// Newline after every opening bracket and separator, indented by
    /// depth.
    Every,
    /// As [`ReturnPolicy::Every`], but empty containers collapse to
    /// `[]` / `{}` inline.
    ExceptEmpty,
    /// As [`ReturnPolicy::ExceptEmpty`], but containers that are simple
    /// (no composite elements; for objects, at most one non-composite
    /// entry) also stay inline.
    Simple,
    /// Never a newline; separators are `,` followed by a space.
    #[default]
    Never,
}

/// What to do when a non-finite double reaches the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialFloatPolicy {
    /// Emit `"NaN"`, `"Infinity"`, `"-Infinity"` as quoted strings. The
    /// output stays valid JSON.
    #[default]
    AsString,
    /// Emit the bare JavaScript literals, which round-trip through the
    /// lenient parser but are not strict JSON.
    AsJsLiteral,
    /// Refuse with a [`FormatError`](super::FormatError).
    Throw,
}

/// Immutable bundle of settings controlling emission.
///
/// # Examples
///
/// ```
/// use jsonvar::{FormatPolicy, Variant};
///
/// let v = jsonvar::parse_str(r#"{"a": [1, 2]}"#).unwrap();
/// let text = jsonvar::format(&v, &FormatPolicy::one_liner()).unwrap();
/// assert_eq!(text, r#"{"a": [1, 2]}"#);
/// ```
#[derive(Debug, Clone)]
pub struct FormatPolicy {
    /// Whitespace regime.
    pub return_policy: ReturnPolicy,
    /// Repeated once per depth level on each newline.
    pub indent: String,
    /// Non-finite double handling.
    pub special_float_policy: SpecialFloatPolicy,
    /// When `true`, every code unit below 0x20 or at or above 0x7F is
    /// emitted as `\uXXXX` (code points beyond the basic plane become a
    /// surrogate pair of escapes).
    pub escape_unicode: bool,
    /// Containers nested deeper than this fail emission; this is the
    /// cycle guard, there is no identity tracking.
    pub max_depth: usize,
}

impl Default for FormatPolicy {
    fn default() -> Self {
        Self::one_liner()
    }
}

impl FormatPolicy {
    /// Everything on one line: `{"a": 1, "b": [1, 2]}`.
    #[must_use]
    pub fn one_liner() -> Self {
        Self {
            return_policy: ReturnPolicy::Never,
            indent: String::new(),
            special_float_policy: SpecialFloatPolicy::AsString,
            escape_unicode: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// One item per line, two-space indent, empty containers inline.
    #[must_use]
    pub fn pretty() -> Self {
        Self {
            return_policy: ReturnPolicy::ExceptEmpty,
            indent: "  ".to_owned(),
            ..Self::one_liner()
        }
    }

    /// As [`FormatPolicy::pretty`], but simple containers stay inline
    /// too.
    #[must_use]
    pub fn mixed() -> Self {
        Self {
            return_policy: ReturnPolicy::Simple,
            indent: "  ".to_owned(),
            ..Self::one_liner()
        }
    }
}
