//! A mutable, dynamic JSON value tree.
//!
//! The center of the crate is [`Variant`], a node holding one of seven
//! kinds (Null, Boolean, Integer, Float, String, Array, Object) with
//! reference semantics and never-failing cross-kind coercion. Around it:
//!
//! - a lenient JSON parser in two monomorphised flavours, one over
//!   16-bit code units ([`parse_units`]) and one over raw UTF-8
//!   ([`parse_str`], [`parse_bytes`]), both interning repeated strings
//!   through a [`StringCache`];
//! - an emitter ([`format`], [`format_bytes`]) driven by a
//!   [`FormatPolicy`] bundle of whitespace, indent, special-float,
//!   unicode-escape, and depth settings;
//! - view types ([`CharView`], [`ByteView`]) giving zero-copy windows
//!   over parse input;
//! - a thread-local [`ConvertScope`] guarding marshalling layers against
//!   circular object graphs.
//!
//! # Examples
//!
//! ```
//! use jsonvar::FormatPolicy;
//!
//! let v = jsonvar::parse_str("{greeting: 'hello', // lenient
//!                              counts: [1, 2,]}").unwrap();
//! assert_eq!(&*v.pick("counts.1").as_string(), "2");
//!
//! v.set("counts", 3);
//! assert_eq!(
//!     jsonvar::format(&v, &FormatPolicy::one_liner()).unwrap(),
//!     r#"{"greeting": "hello", "counts": 3}"#,
//! );
//! ```
//!
//! Container handles share their bodies; [`Variant::duplicate`] is the
//! only way to fork an independent tree. Nothing here is safe for
//! concurrent mutation (handles are intentionally `!Send`); the one
//! cross-thread piece is [`SharedStringCache`].

mod array;
mod cache;
mod convert;
mod emit;
pub mod literals;
mod object;
mod parser;
mod variant;
mod view;

pub use array::Array;
pub use cache::{CacheOptions, SharedStringCache, StringCache, TempStringCache};
pub use convert::{ConvertError, ConvertScope, Converter, FromVariant, IntoVariant};
pub use emit::{
    format, format_bytes, FormatError, FormatPolicy, ReturnPolicy, Sink, SpecialFloatPolicy,
    DEFAULT_MAX_DEPTH,
};
pub use object::Object;
pub use parser::{
    parse_bytes, parse_bytes_with, parse_str, parse_str_with, parse_units, parse_units_with,
    ParseError, SyntaxError,
};
pub use variant::{Kind, Variant, VariantIndex};
pub use view::{ByteView, CharView};

#[cfg(test)]
mod tests;
