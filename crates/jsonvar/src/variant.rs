//! The dynamic value node.
//!
//! A [`Variant`] holds exactly one of seven kinds: Null, Boolean, Integer,
//! Float, String, Array, Object. Variants have reference semantics:
//! cloning one aliases the same node, and assignment through any alias is
//! observable through all of them. [`Variant::duplicate`] is the only way
//! to fork an independent copy.
//!
//! Typed accessors never fail; they coerce across kinds following a fixed
//! table (a string `"12"` reads as the integer 12, an array reads as its
//! element count, and so on). Container-style mutators on a non-composite
//! variant first rewrite the variant into a container in place, carrying
//! the former scalar along as its sole element.

use std::{cell::Ref, cell::RefCell, fmt, rc::Rc, sync::Arc};

use crate::{
    array::Array,
    emit::{self, FormatPolicy, SpecialFloatPolicy},
    literals,
    object::Object,
    parser::{self, ParseError},
    view::ByteView,
};

/// Discriminator for the seven value kinds a [`Variant`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

/// The payload behind a variant node. Handles clone cheaply, so cloning a
/// `Repr` never deep-copies a tree.
#[derive(Clone)]
pub(crate) enum Repr {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(Arc<str>),
    Array(Array),
    Object(Object),
}

/// A dynamic value node.
///
/// # Reference semantics
///
/// `Clone` produces an alias of the same node, mirroring how the handles
/// returned by container reads stay live across later updates:
///
/// ```
/// use jsonvar::Variant;
///
/// let v = Variant::from(1);
/// let alias = v.clone();
/// v.assign("replaced");
/// assert_eq!(&*alias.as_string(), "replaced");
/// ```
///
/// # Coercion
///
/// The `as_*` accessors never fail and the container mutators coerce the
/// node in place first:
///
/// ```
/// use jsonvar::{Kind, Variant};
///
/// let v = Variant::new();
/// v.add(1);
/// v.add("x");
/// assert_eq!(v.kind(), Kind::Array);
/// v.set("k", true);
/// assert_eq!(v.kind(), Kind::Object);
/// assert_eq!(v.get("0").as_long(), 1);
/// ```
#[derive(Clone, Default)]
pub struct Variant {
    node: Rc<RefCell<Repr>>,
}

impl Default for Repr {
    fn default() -> Self {
        Repr::Null
    }
}

impl Variant {
    /// Creates a Null variant.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_repr(repr: Repr) -> Self {
        Self {
            node: Rc::new(RefCell::new(repr)),
        }
    }

    pub(crate) fn repr(&self) -> Ref<'_, Repr> {
        self.node.borrow()
    }

    /// The currently active kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match &*self.repr() {
            Repr::Null => Kind::Null,
            Repr::Boolean(_) => Kind::Boolean,
            Repr::Integer(_) => Kind::Integer,
            Repr::Float(_) => Kind::Float,
            Repr::String(_) => Kind::String,
            Repr::Array(_) => Kind::Array,
            Repr::Object(_) => Kind::Object,
        }
    }

    /// Returns `true` if the variant is Null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    /// Returns `true` if the variant is Boolean.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.kind() == Kind::Boolean
    }

    /// Returns `true` if the variant is Integer or Float.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self.kind(), Kind::Integer | Kind::Float)
    }

    /// Returns `true` if the variant is String.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.kind() == Kind::String
    }

    /// Returns `true` if the variant is Array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    /// Returns `true` if the variant is Object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.kind() == Kind::Object
    }

    /// Returns `true` if the variant is Array or Object.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self.kind(), Kind::Array | Kind::Object)
    }

    /// Returns `true` for Null, Boolean false, numeric zero, the empty
    /// string, and zero-length containers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &*self.repr() {
            Repr::Null => true,
            Repr::Boolean(b) => !*b,
            Repr::Integer(n) => *n == 0,
            Repr::Float(x) => *x == 0.0,
            Repr::String(s) => s.is_empty(),
            Repr::Array(a) => a.is_empty(),
            Repr::Object(o) => o.is_empty(),
        }
    }

    /// Reads the variant as a boolean, coercing across kinds.
    ///
    /// Strings count as `true` when they parse to a non-zero integer or
    /// spell `true` in any ASCII case; containers count as `true` when
    /// non-empty.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match &*self.repr() {
            Repr::Null => false,
            Repr::Boolean(b) => *b,
            Repr::Integer(n) => *n != 0,
            Repr::Float(x) => *x != 0.0,
            Repr::String(s) => {
                let trimmed = s.trim();
                let (value, consumed) = ByteView::from(trimmed).parse_i64();
                (consumed > 0 && value != 0) || trimmed.eq_ignore_ascii_case("true")
            }
            Repr::Array(a) => !a.is_empty(),
            Repr::Object(o) => !o.is_empty(),
        }
    }

    /// Reads the variant as a 32-bit integer; see [`Variant::as_long`].
    #[must_use]
    pub fn as_int(&self) -> i32 {
        match &*self.repr() {
            Repr::String(s) => ByteView::from(s.trim()).parse_i32().0,
            _ => self.as_long() as i32,
        }
    }

    /// Reads the variant as a 64-bit integer, coercing across kinds.
    ///
    /// Booleans read as 0 or 1, floats truncate, strings parse leniently
    /// (yielding 0 when no digit leads), containers read as their count.
    #[must_use]
    pub fn as_long(&self) -> i64 {
        match &*self.repr() {
            Repr::Null => 0,
            Repr::Boolean(b) => i64::from(*b),
            Repr::Integer(n) => *n,
            Repr::Float(x) => *x as i64,
            Repr::String(s) => ByteView::from(s.trim()).parse_i64().0,
            Repr::Array(a) => a.count() as i64,
            Repr::Object(o) => o.count() as i64,
        }
    }

    /// Reads the variant as a double, coercing across kinds.
    ///
    /// Strings recognise the `NaN`, `Infinity`, and `-Infinity` spellings
    /// before falling back to lenient decimal parsing.
    #[must_use]
    pub fn as_double(&self) -> f64 {
        match &*self.repr() {
            Repr::Null => 0.0,
            Repr::Boolean(b) => f64::from(u8::from(*b)),
            Repr::Integer(n) => *n as f64,
            Repr::Float(x) => *x,
            Repr::String(s) => {
                let trimmed = s.trim();
                if trimmed == literals::NAN.text {
                    f64::NAN
                } else if trimmed == literals::INFINITY.text {
                    f64::INFINITY
                } else if trimmed == literals::NEG_INFINITY.text {
                    f64::NEG_INFINITY
                } else {
                    ByteView::from(trimmed).parse_f64().0
                }
            }
            Repr::Array(a) => a.count() as f64,
            Repr::Object(o) => o.count() as f64,
        }
    }

    /// Reads the variant as a string, coercing across kinds.
    ///
    /// Containers render as a count summary: `"[3]"` for a three-element
    /// array, `"{2}"` for a two-entry object.
    #[must_use]
    pub fn as_string(&self) -> Arc<str> {
        match &*self.repr() {
            Repr::Null => Arc::from(""),
            Repr::Boolean(b) => Arc::from(if *b {
                literals::TRUE.text
            } else {
                literals::FALSE.text
            }),
            Repr::Integer(n) => n.to_string().into(),
            Repr::Float(x) => literals::float_repr(*x).into(),
            Repr::String(s) => Arc::clone(s),
            Repr::Array(a) => format!("[{}]", a.count()).into(),
            Repr::Object(o) => format!("{{{}}}", o.count()).into(),
        }
    }

    /// Reads the variant as an array handle, coercing across kinds.
    ///
    /// An Array payload aliases its own body; a scalar yields a fresh
    /// single-element array; an Object projects through
    /// [`Object::try_convert_to_array`] when its keys are all indices,
    /// and otherwise becomes the sole element of a fresh array. The
    /// variant itself is not modified.
    #[must_use]
    pub fn as_array(&self) -> Array {
        match &*self.repr() {
            Repr::Null => Array::new(),
            Repr::Array(a) => a.clone(),
            Repr::Object(o) => o
                .try_convert_to_array()
                .unwrap_or_else(|| Array::from(vec![Variant::from(o.clone())])),
            scalar => Array::from(vec![Variant::from_repr(scalar.clone())]),
        }
    }

    /// Reads the variant as an object handle, coercing across kinds.
    ///
    /// An Object payload aliases its own body; an Array projects to keys
    /// `"0"`, `"1"`, ...; a scalar becomes `{"value": scalar}`. The
    /// variant itself is not modified.
    #[must_use]
    pub fn as_object(&self) -> Object {
        match &*self.repr() {
            Repr::Null => Object::new(),
            Repr::Object(o) => o.clone(),
            Repr::Array(a) => a.convert_to_object(),
            scalar => {
                let mut obj = Object::new();
                obj.set("value", Variant::from_repr(scalar.clone()));
                obj
            }
        }
    }

    /// Replaces kind and payload in place.
    ///
    /// Every alias of this node observes the new value. Assigning a
    /// variant to itself is a no-op.
    pub fn assign(&self, value: impl Into<Variant>) {
        let value = value.into();
        if Rc::ptr_eq(&self.node, &value.node) {
            return;
        }
        let repr = value.repr().clone();
        *self.node.borrow_mut() = repr;
    }

    /// Appends to the variant as an array, coercing it in place first.
    ///
    /// A Null variant becomes an empty array before the append; any other
    /// non-array payload becomes the sole element of the new array, so
    /// the former value survives at index 0.
    pub fn add(&self, value: impl Into<Variant>) {
        let mut array = self.coerce_array_in_place();
        array.add(value.into());
    }

    /// Indexed read. Missing slots are created: an out-of-range position
    /// extends an array with Nulls, an absent key inserts a Null, and a
    /// non-composite variant is coerced into a container first.
    pub fn at(&self, index: impl VariantIndex) -> Variant {
        index.index_into(self)
    }

    /// Non-mutating read: returns a Null variant for anything missing and
    /// never restructures the tree.
    #[must_use]
    pub fn get(&self, index: impl VariantIndex) -> Variant {
        index.get_from(self)
    }

    /// Indexed write, with the same creation and coercion behaviour as
    /// [`Variant::at`].
    pub fn set(&self, index: impl VariantIndex, value: impl Into<Variant>) {
        index.set_into(self, value.into());
    }

    /// Follows a dot-separated path of keys, each trimmed of ASCII
    /// whitespace. Objects are followed by key, arrays by integer-valued
    /// key. Returns a Null variant at the first unresolvable step; the
    /// tree is never modified.
    ///
    /// ```
    /// use jsonvar::Variant;
    ///
    /// let v = jsonvar::parse_str(r#"{"a": {"b": [10, 20]}}"#).unwrap();
    /// assert_eq!(v.pick("a.b.1").as_long(), 20);
    /// assert!(v.pick("a.missing.1").is_null());
    /// ```
    #[must_use]
    pub fn pick(&self, path: &str) -> Variant {
        let mut current = self.clone();
        for segment in path.split('.') {
            let key = segment.trim();
            let next = current.get(key);
            current = next;
        }
        current
    }

    /// Deep clone: scalars are copied, containers are cloned recursively
    /// into fresh bodies. The result shares no state with `self`.
    #[must_use]
    pub fn duplicate(&self) -> Variant {
        match &*self.repr() {
            Repr::Array(a) => Variant::from(a.duplicate()),
            Repr::Object(o) => Variant::from(o.duplicate()),
            scalar => Variant::from_repr(scalar.clone()),
        }
    }

    /// Identity-flavoured equality: kinds must match, scalar payloads
    /// must be equal, and composite payloads must reference the same
    /// body. Compare with [`Variant::equivalent`] for structural
    /// equality.
    #[must_use]
    pub fn equals(&self, other: &Variant) -> bool {
        if Rc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        match (&*self.repr(), &*other.repr()) {
            (Repr::Null, Repr::Null) => true,
            (Repr::Boolean(a), Repr::Boolean(b)) => a == b,
            (Repr::Integer(a), Repr::Integer(b)) => a == b,
            (Repr::Float(a), Repr::Float(b)) => a == b,
            (Repr::String(a), Repr::String(b)) => a == b,
            (Repr::Array(a), Repr::Array(b)) => a == b,
            (Repr::Object(a), Repr::Object(b)) => a == b,
            _ => false,
        }
    }

    /// Structural equality with recursive value comparison, bounded by
    /// `max_depth` container levels.
    ///
    /// Integer and Float payloads compare numerically and two NaNs count
    /// as equal, so a parse/emit round trip stays equivalent. Trees
    /// deeper than `max_depth` are not known equal and compare `false`.
    #[must_use]
    pub fn equivalent(&self, other: &Variant, max_depth: usize) -> bool {
        if Rc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        match (&*self.repr(), &*other.repr()) {
            (Repr::Null, Repr::Null) => true,
            (Repr::Boolean(a), Repr::Boolean(b)) => a == b,
            (Repr::Integer(a), Repr::Integer(b)) => a == b,
            (Repr::Integer(a), Repr::Float(b)) | (Repr::Float(b), Repr::Integer(a)) => {
                (*a as f64) == *b
            }
            (Repr::Float(a), Repr::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Repr::String(a), Repr::String(b)) => a == b,
            (Repr::Array(a), Repr::Array(b)) => {
                max_depth > 0 && a.equivalent(b, max_depth - 1)
            }
            (Repr::Object(a), Repr::Object(b)) => {
                max_depth > 0 && a.equivalent(b, max_depth - 1)
            }
            _ => false,
        }
    }

    /// Parses UTF-8 text into a variant tree with a fresh temporary
    /// string cache; see [`parse_str`](crate::parse_str).
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying the failure position.
    pub fn parse_str(input: &str) -> Result<Variant, ParseError> {
        parser::parse_str(input)
    }

    /// Parses 16-bit code units; see [`parse_units`](crate::parse_units).
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying the failure position.
    pub fn parse_units(units: &[u16]) -> Result<Variant, ParseError> {
        parser::parse_units(units)
    }

    /// Parses raw UTF-8 bytes; see [`parse_bytes`](crate::parse_bytes).
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying the failure position.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Variant, ParseError> {
        parser::parse_bytes(bytes)
    }

    /// Rewrites the payload into an array in place and returns a handle
    /// sharing the (materialised) body now stored in the node.
    pub(crate) fn coerce_array_in_place(&self) -> Array {
        let mut guard = self.node.borrow_mut();
        if let Repr::Array(a) = &*guard {
            if a.has_body() {
                return a.clone();
            }
        }
        let replacement = match &*guard {
            Repr::Array(_) | Repr::Null => Array::from(Vec::new()),
            Repr::Object(o) => o
                .try_convert_to_array()
                .unwrap_or_else(|| Array::from(vec![Variant::from(o.clone())])),
            scalar => Array::from(vec![Variant::from_repr(scalar.clone())]),
        };
        *guard = Repr::Array(replacement.clone());
        replacement
    }

    /// Rewrites the payload into an object in place and returns a handle
    /// sharing the (materialised) body now stored in the node.
    pub(crate) fn coerce_object_in_place(&self) -> Object {
        let mut guard = self.node.borrow_mut();
        if let Repr::Object(o) = &*guard {
            if o.has_body() {
                return o.clone();
            }
        }
        let replacement = match &*guard {
            Repr::Object(_) | Repr::Null => Object::from_entries(Vec::new()),
            Repr::Array(a) => a.convert_to_object(),
            scalar => Object::from_entries(vec![(
                Arc::from("value"),
                Variant::from_repr(scalar.clone()),
            )]),
        };
        *guard = Repr::Object(replacement.clone());
        replacement
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.repr() {
            Repr::Null => f.write_str("Null"),
            Repr::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Repr::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Repr::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Repr::String(s) => f.debug_tuple("String").field(&&**s).finish(),
            Repr::Array(a) => write!(f, "Array({a:?})"),
            Repr::Object(o) => write!(f, "Object({o:?})"),
        }
    }
}

impl fmt::Display for Variant {
    /// Renders the compact one-line form. Non-finite floats print as
    /// their JavaScript literals, which the lenient parser reads back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = FormatPolicy {
            special_float_policy: SpecialFloatPolicy::AsJsLiteral,
            ..FormatPolicy::one_liner()
        };
        let text = emit::format(self, &policy).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

macro_rules! from_integer {
    ($($ty:ty),+) => {
        $(impl From<$ty> for Variant {
            fn from(value: $ty) -> Self {
                Variant::from_repr(Repr::Integer(i64::from(value)))
            }
        })+
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Variant {
    /// Unsigned 64-bit values traffic through double, which is the widest
    /// numeric the wire format carries for them.
    fn from(value: u64) -> Self {
        Variant::from_repr(Repr::Float(value as f64))
    }
}

impl From<f32> for Variant {
    fn from(value: f32) -> Self {
        Variant::from_repr(Repr::Float(f64::from(value)))
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::from_repr(Repr::Float(value))
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::from_repr(Repr::Boolean(value))
    }
}

impl From<char> for Variant {
    fn from(value: char) -> Self {
        Variant::from_repr(Repr::String(String::from(value).into()))
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::from_repr(Repr::String(value.into()))
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::from_repr(Repr::String(value.into()))
    }
}

impl From<Arc<str>> for Variant {
    fn from(value: Arc<str>) -> Self {
        Variant::from_repr(Repr::String(value))
    }
}

impl From<Array> for Variant {
    fn from(value: Array) -> Self {
        Variant::from_repr(Repr::Array(value))
    }
}

impl From<Object> for Variant {
    fn from(value: Object) -> Self {
        Variant::from_repr(Repr::Object(value))
    }
}

/// Index types accepted by [`Variant::at`], [`Variant::get`], and
/// [`Variant::set`]: `usize` positions and string keys.
///
/// An integer index dispatches to the array accessor; on an Object the
/// index is stringified, and on a scalar the variant is coerced to Array
/// first. A string key dispatches to the object accessor; on an Array the
/// key is parsed as an index when possible, and otherwise the variant is
/// coerced to Object.
pub trait VariantIndex: private::Sealed {
    #[doc(hidden)]
    fn index_into(&self, variant: &Variant) -> Variant;
    #[doc(hidden)]
    fn get_from(&self, variant: &Variant) -> Variant;
    #[doc(hidden)]
    fn set_into(&self, variant: &Variant, value: Variant);
}

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for &str {}
    impl Sealed for String {}
    impl Sealed for &String {}
}

impl VariantIndex for usize {
    fn index_into(&self, variant: &Variant) -> Variant {
        if variant.is_object() {
            variant.coerce_object_in_place().at(self.to_string())
        } else {
            variant.coerce_array_in_place().at(*self)
        }
    }

    fn get_from(&self, variant: &Variant) -> Variant {
        match &*variant.repr() {
            Repr::Array(a) => a.get(*self),
            Repr::Object(o) => o.get(&self.to_string()),
            _ => Variant::new(),
        }
    }

    fn set_into(&self, variant: &Variant, value: Variant) {
        if variant.is_object() {
            variant.coerce_object_in_place().set(self.to_string(), value);
        } else {
            variant.coerce_array_in_place().set(*self, value);
        }
    }
}

/// A string key addressing an array reads as an index when the whole key
/// parses as a non-negative integer.
fn key_as_index(key: &str) -> Option<usize> {
    let view = ByteView::from(key);
    let (value, consumed) = view.parse_i64();
    (consumed == view.len() && consumed > 0 && value >= 0).then_some(value as usize)
}

impl VariantIndex for &str {
    fn index_into(&self, variant: &Variant) -> Variant {
        if variant.is_array() {
            if let Some(index) = key_as_index(self) {
                return variant.coerce_array_in_place().at(index);
            }
        }
        variant.coerce_object_in_place().at(*self)
    }

    fn get_from(&self, variant: &Variant) -> Variant {
        match &*variant.repr() {
            Repr::Object(o) => o.get(self),
            Repr::Array(a) => match key_as_index(self) {
                Some(index) => a.get(index),
                None => Variant::new(),
            },
            _ => Variant::new(),
        }
    }

    fn set_into(&self, variant: &Variant, value: Variant) {
        if variant.is_array() {
            if let Some(index) = key_as_index(self) {
                variant.coerce_array_in_place().set(index, value);
                return;
            }
        }
        variant.coerce_object_in_place().set(*self, value);
    }
}

impl VariantIndex for String {
    fn index_into(&self, variant: &Variant) -> Variant {
        self.as_str().index_into(variant)
    }

    fn get_from(&self, variant: &Variant) -> Variant {
        self.as_str().get_from(variant)
    }

    fn set_into(&self, variant: &Variant, value: Variant) {
        self.as_str().set_into(variant, value);
    }
}

impl VariantIndex for &String {
    fn index_into(&self, variant: &Variant) -> Variant {
        self.as_str().index_into(variant)
    }

    fn get_from(&self, variant: &Variant) -> Variant {
        self.as_str().get_from(variant)
    }

    fn set_into(&self, variant: &Variant, value: Variant) {
        self.as_str().set_into(variant, value);
    }
}
