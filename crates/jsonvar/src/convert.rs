//! The conversion context and the fixed primitive conversion set.
//!
//! Marshalling layers built on this crate (record-to-tree converters and
//! the like) recurse through user types, and a cyclic object graph would
//! recurse forever. The defence is the same depth counter the emitter
//! uses, held in a thread-local [`ConvertScope`] that brackets every
//! conversion call. The scope also carries a stack of active converters,
//! so a nested conversion started from inside a convertible type can
//! find the converter that initiated it.
//!
//! The primitive conversions themselves are the [`FromVariant`] and
//! [`IntoVariant`] ladders: every signed and unsigned integer width,
//! both float widths, booleans, single code units, strings, and the
//! container handles. On primitives they cannot fail (they follow the
//! coercion table); fallible user-type impls surface [`ConvertError`].

use std::{cell::RefCell, rc::Rc, sync::Arc};

use thiserror::Error;

use crate::{array::Array, emit::DEFAULT_MAX_DEPTH, object::Object, variant::Variant};

/// A conversion was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("conversion too deep, circular reference suspected")]
    TooDeep,
    #[error("conversion failed: {0}")]
    Failed(String),
}

/// A converter participating in a marshalling pipeline.
///
/// The core does not call converters itself; it only keeps the active
/// ones reachable while a conversion is in flight. Implementations live
/// in the marshalling layer.
pub trait Converter {
    /// Builds a variant tree from a source value the converter
    /// understands.
    ///
    /// # Errors
    ///
    /// Returns a [`ConvertError`] when the source is not convertible.
    fn to_variant(&self, source: &dyn std::any::Any) -> Result<Variant, ConvertError>;

    /// Rebuilds a source value from a variant tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ConvertError`] when the tree does not fit the target.
    fn from_variant(&self, value: &Variant) -> Result<Box<dyn std::any::Any>, ConvertError>;
}

#[derive(Default)]
struct ContextState {
    depth: usize,
    converters: Vec<Rc<dyn Converter>>,
}

thread_local! {
    static CONTEXT: RefCell<Option<ContextState>> = const { RefCell::new(None) };
}

/// A re-entrant guard over the thread's conversion context.
///
/// Entering increments the depth counter and fails once it would pass
/// `max_depth`; dropping decrements it and clears the context when the
/// outermost scope ends.
///
/// # Examples
///
/// ```
/// use jsonvar::ConvertScope;
///
/// let outer = ConvertScope::enter(2).unwrap();
/// let inner = ConvertScope::enter(2).unwrap();
/// assert!(ConvertScope::enter(2).is_err());
/// drop(inner);
/// assert!(ConvertScope::enter(2).is_ok());
/// # drop(outer);
/// ```
#[must_use = "the scope releases its depth level when dropped"]
#[derive(Debug)]
pub struct ConvertScope {
    // Keeps the type out of Send/Sync space: the context is thread-local.
    _not_send: std::marker::PhantomData<*const ()>,
}

impl ConvertScope {
    /// Enters one conversion level.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::TooDeep`] when `max_depth` levels are
    /// already active on this thread.
    pub fn enter(max_depth: usize) -> Result<Self, ConvertError> {
        CONTEXT.with(|slot| {
            let mut slot = slot.borrow_mut();
            let state = slot.get_or_insert_with(ContextState::default);
            if state.depth >= max_depth {
                if state.depth == 0 {
                    *slot = None;
                }
                return Err(ConvertError::TooDeep);
            }
            state.depth += 1;
            Ok(Self {
                _not_send: std::marker::PhantomData,
            })
        })
    }

    /// Pushes a converter for nested conversions to find.
    pub fn push_converter(&self, converter: Rc<dyn Converter>) {
        CONTEXT.with(|slot| {
            if let Some(state) = slot.borrow_mut().as_mut() {
                state.converters.push(converter);
            }
        });
    }

    /// Pops the most recently pushed converter.
    pub fn pop_converter(&self) -> Option<Rc<dyn Converter>> {
        CONTEXT.with(|slot| slot.borrow_mut().as_mut()?.converters.pop())
    }

    /// The converter a nested conversion should consult, if any.
    #[must_use]
    pub fn current_converter(&self) -> Option<Rc<dyn Converter>> {
        CONTEXT.with(|slot| slot.borrow().as_ref()?.converters.last().cloned())
    }

    /// Depth of the context on this thread, counting this scope.
    #[must_use]
    pub fn depth(&self) -> usize {
        CONTEXT.with(|slot| slot.borrow().as_ref().map_or(0, |state| state.depth))
    }
}

impl Drop for ConvertScope {
    fn drop(&mut self) {
        CONTEXT.with(|slot| {
            let mut slot = slot.borrow_mut();
            if let Some(state) = slot.as_mut() {
                state.depth = state.depth.saturating_sub(1);
                if state.depth == 0 {
                    *slot = None;
                }
            }
        });
    }
}

/// Conversion out of a variant tree.
pub trait FromVariant: Sized {
    /// Reads `Self` out of `value`.
    ///
    /// # Errors
    ///
    /// Primitive impls never fail; user-type impls return a
    /// [`ConvertError`] when the tree does not fit.
    fn from_variant(value: &Variant) -> Result<Self, ConvertError>;
}

/// Conversion into a variant tree.
pub trait IntoVariant {
    /// Builds a variant from `self`.
    ///
    /// # Errors
    ///
    /// Primitive impls never fail; user-type impls return a
    /// [`ConvertError`] when the value cannot be represented.
    fn into_variant(self) -> Result<Variant, ConvertError>;
}

impl Variant {
    /// Converts the tree into `T` inside a fresh conversion scope,
    /// propagating any [`ConvertError`].
    ///
    /// # Errors
    ///
    /// Whatever `T::from_variant` raises, plus
    /// [`ConvertError::TooDeep`] from the scope itself.
    pub fn convert_to<T: FromVariant>(&self) -> Result<T, ConvertError> {
        let _scope = ConvertScope::enter(DEFAULT_MAX_DEPTH)?;
        T::from_variant(self)
    }

    /// Non-propagating twin of [`Variant::convert_to`]: a failed
    /// conversion yields `T::default()` instead of an error.
    #[must_use]
    pub fn convert_or_default<T: FromVariant + Default>(&self) -> T {
        self.convert_to().unwrap_or_default()
    }
}

macro_rules! from_variant_via {
    ($($ty:ty => $accessor:ident as $cast:ty),+ $(,)?) => {
        $(impl FromVariant for $ty {
            fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
                Ok(value.$accessor() as $cast)
            }
        })+
    };
}

from_variant_via!(
    i8 => as_int as i8,
    i16 => as_int as i16,
    u8 => as_int as u8,
    u16 => as_int as u16,
    u32 => as_long as u32,
    u64 => as_double as u64,
    f32 => as_double as f32,
);

impl FromVariant for i32 {
    fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
        Ok(value.as_int())
    }
}

impl FromVariant for i64 {
    fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
        Ok(value.as_long())
    }
}

impl FromVariant for f64 {
    fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
        Ok(value.as_double())
    }
}

impl FromVariant for bool {
    fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
        Ok(value.as_bool())
    }
}

impl FromVariant for char {
    /// Single code unit: the first character of the string form, `'\0'`
    /// when it is empty.
    fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
        Ok(value.as_string().chars().next().unwrap_or('\0'))
    }
}

impl FromVariant for String {
    fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
        Ok(value.as_string().to_string())
    }
}

impl FromVariant for Arc<str> {
    fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
        Ok(value.as_string())
    }
}

impl FromVariant for Variant {
    fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
        Ok(value.clone())
    }
}

impl FromVariant for Array {
    fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
        Ok(value.as_array())
    }
}

impl FromVariant for Object {
    fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
        Ok(value.as_object())
    }
}

impl<T: Into<Variant>> IntoVariant for T {
    fn into_variant(self) -> Result<Variant, ConvertError> {
        Ok(self.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConvertError, ConvertScope, FromVariant};
    use crate::variant::Variant;

    #[test]
    fn depth_counts_and_clears() {
        {
            let outer = ConvertScope::enter(4).unwrap();
            assert_eq!(outer.depth(), 1);
            let inner = ConvertScope::enter(4).unwrap();
            assert_eq!(inner.depth(), 2);
        }
        let fresh = ConvertScope::enter(1).unwrap();
        assert_eq!(fresh.depth(), 1);
        assert_eq!(ConvertScope::enter(1).unwrap_err(), ConvertError::TooDeep);
    }

    #[test]
    fn primitive_ladder_coerces() {
        let v = Variant::from("42");
        assert_eq!(i64::from_variant(&v).unwrap(), 42);
        assert_eq!(bool::from_variant(&v).unwrap(), true);
        assert_eq!(f64::from_variant(&v).unwrap(), 42.0);
        assert_eq!(char::from_variant(&v).unwrap(), '4');
        assert_eq!(String::from_variant(&Variant::from(true)).unwrap(), "true");
    }

    #[test]
    fn convert_or_default_swallows_failure() {
        struct Picky;
        impl FromVariant for Picky {
            fn from_variant(value: &Variant) -> Result<Self, ConvertError> {
                if value.is_object() {
                    Ok(Picky)
                } else {
                    Err(ConvertError::Failed("object required".into()))
                }
            }
        }
        impl Default for Picky {
            fn default() -> Self {
                Picky
            }
        }

        let v = Variant::from(1);
        assert!(v.convert_to::<Picky>().is_err());
        let _fallback: Picky = v.convert_or_default();

        assert_eq!(v.convert_or_default::<i64>(), 1);
    }
}
