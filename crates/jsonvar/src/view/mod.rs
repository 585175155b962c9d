//! Immutable windows over shared text buffers.
//!
//! A view is a `(buffer, offset, length)` triple. The buffer is reference
//! counted, so a view may outlive whatever produced it, and slicing never
//! copies. Two concrete types cover the two input alphabets the crate
//! accepts: [`CharView`] indexes 16-bit code units, [`ByteView`] indexes
//! UTF-8 bytes. They share the same operation surface but deliberately not
//! the same storage or a common generic, so the parsers monomorphise
//! against plain slices.
//!
//! Both types compare, order, and hash by content, and both carry
//! locale-free numeric parsing that reports how many units were consumed
//! instead of failing.

mod bytes;
mod chars;

pub use bytes::ByteView;
pub use chars::CharView;
