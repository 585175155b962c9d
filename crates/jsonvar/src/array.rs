//! The array handle.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::{object::Object, variant::Variant};

type Body = Rc<RefCell<Vec<Variant>>>;

/// A value-typed handle over a shared, ordered sequence of variants.
///
/// Copying the handle aliases the body: mutations through one copy are
/// observable through every other. Two handles compare equal iff they
/// reference the same body. A fresh handle has no body at all; reads
/// treat that state as an empty array and the first write materialises
/// one.
///
/// Every slot stores a real variant. Absent values are Null-kind
/// variants, never holes, and the indexed read [`Array::at`] extends the
/// body with Nulls up to the requested position as a documented side
/// effect. Use [`Array::get`] to read without extending.
///
/// # Examples
///
/// ```
/// use jsonvar::Array;
///
/// let mut a = Array::new();
/// a.add(1);
/// let mut alias = a.clone();
/// alias.add(2);
/// assert_eq!(a.count(), 2);
///
/// assert!(a.get(7).is_null());
/// assert_eq!(a.count(), 2);
/// assert!(a.at(7).is_null());
/// assert_eq!(a.count(), 8);
/// ```
#[derive(Clone, Default)]
pub struct Array {
    body: Option<Body>,
}

impl Array {
    /// Creates a handle with no body yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn has_body(&self) -> bool {
        self.body.is_some()
    }

    fn body_mut(&mut self) -> Body {
        Rc::clone(
            self.body
                .get_or_insert_with(|| Rc::new(RefCell::new(Vec::new()))),
        )
    }

    /// Number of elements.
    #[must_use]
    pub fn count(&self) -> usize {
        self.body.as_ref().map_or(0, |b| b.borrow().len())
    }

    /// Returns `true` if the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Appends a value, materialising the body if needed.
    pub fn add(&mut self, value: impl Into<Variant>) {
        let body = self.body_mut();
        body.borrow_mut().push(value.into());
    }

    /// Reads without extending: a Null variant is returned for any
    /// out-of-range position and the array is left untouched.
    #[must_use]
    pub fn get(&self, index: usize) -> Variant {
        self.body
            .as_ref()
            .and_then(|b| b.borrow().get(index).cloned())
            .unwrap_or_default()
    }

    /// Indexed read: extends the body with Null variants up to `index`
    /// inclusive, then returns the slot.
    pub fn at(&mut self, index: usize) -> Variant {
        let body = self.body_mut();
        let mut items = body.borrow_mut();
        if items.len() <= index {
            items.resize_with(index + 1, Variant::new);
        }
        items[index].clone()
    }

    /// Indexed write, extending with Null variants as needed. The slot is
    /// replaced with `value` (aliasing it, when it is a variant).
    pub fn set(&mut self, index: usize, value: impl Into<Variant>) {
        let body = self.body_mut();
        let mut items = body.borrow_mut();
        if items.len() <= index {
            items.resize_with(index + 1, Variant::new);
        }
        items[index] = value.into();
    }

    /// Inserts at `index`, shifting later elements. Positions past the
    /// end append.
    pub fn insert(&mut self, index: usize, value: impl Into<Variant>) {
        let body = self.body_mut();
        let mut items = body.borrow_mut();
        let index = index.min(items.len());
        items.insert(index, value.into());
    }

    /// Removes and returns the element at `index`, shifting later
    /// elements, or `None` when out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<Variant> {
        let body = self.body.as_ref()?;
        let mut items = body.borrow_mut();
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// Removes the first element equal to `value` (by [`Variant::equals`]).
    /// Returns `true` when something was removed.
    pub fn remove(&mut self, value: &Variant) -> bool {
        match self.index_of(value) {
            Some(index) => {
                self.remove_at(index);
                true
            }
            None => false,
        }
    }

    /// Position of the first element equal to `value`.
    #[must_use]
    pub fn index_of(&self, value: &Variant) -> Option<usize> {
        let body = self.body.as_ref()?;
        let items = body.borrow();
        items.iter().position(|v| v.equals(value))
    }

    /// Returns `true` if some element equals `value`.
    #[must_use]
    pub fn contains(&self, value: &Variant) -> bool {
        self.index_of(value).is_some()
    }

    /// Truncates or pads with Null variants to exactly `len` elements.
    pub fn resize(&mut self, len: usize) {
        let body = self.body_mut();
        body.borrow_mut().resize_with(len, Variant::new);
    }

    /// Truncates the shared body in place; every aliasing handle observes
    /// the empty array.
    pub fn clear(&mut self) {
        if let Some(body) = &self.body {
            body.borrow_mut().clear();
        }
    }

    /// Produces an object whose keys are the stringified indices. The
    /// entries alias the array's slots.
    #[must_use]
    pub fn convert_to_object(&self) -> Object {
        let entries = self
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string().into(), v))
            .collect();
        Object::from_entries(entries)
    }

    /// Returns `true` if no element is a container. The emitter keeps
    /// simple arrays on one line under the `Simple` whitespace policy.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.body.as_ref().map_or(true, |b| {
            b.borrow().iter().all(|v| !v.is_composite())
        })
    }

    /// Deep clone: a fresh body whose elements are recursive duplicates.
    #[must_use]
    pub fn duplicate(&self) -> Array {
        match &self.body {
            None => Array::new(),
            Some(body) => {
                let items = body.borrow().iter().map(Variant::duplicate).collect();
                Array::from_vec(items)
            }
        }
    }

    /// Element-wise structural equality bounded by `max_depth`; see
    /// [`Variant::equivalent`].
    #[must_use]
    pub fn equivalent(&self, other: &Array, max_depth: usize) -> bool {
        if self == other {
            return true;
        }
        if self.count() != other.count() {
            return false;
        }
        self.iter()
            .zip(other.iter())
            .all(|(a, b)| a.equivalent(&b, max_depth))
    }

    /// Iterates over a snapshot of the elements. The yielded variants
    /// alias the slots, so assigning through them is observable; the
    /// iteration itself is unaffected by concurrent mutation.
    #[must_use]
    pub fn iter(&self) -> std::vec::IntoIter<Variant> {
        self.body
            .as_ref()
            .map_or_else(Vec::new, |b| b.borrow().clone())
            .into_iter()
    }

    fn from_vec(items: Vec<Variant>) -> Self {
        Self {
            body: Some(Rc::new(RefCell::new(items))),
        }
    }
}

impl PartialEq for Array {
    /// Handle equality: `true` iff both handles reference the same body.
    /// Two bodiless handles name the same observationally-empty state and
    /// compare equal.
    fn eq(&self, other: &Self) -> bool {
        match (&self.body, &other.body) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl From<Vec<Variant>> for Array {
    fn from(items: Vec<Variant>) -> Self {
        Self::from_vec(items)
    }
}

impl<T: Into<Variant>> FromIterator<T> for Array {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for &Array {
    type Item = Variant;
    type IntoIter = std::vec::IntoIter<Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
