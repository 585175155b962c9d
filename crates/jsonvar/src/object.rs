//! The object handle.

use std::{cell::RefCell, fmt, rc::Rc, sync::Arc};

use indexmap::IndexMap;

use crate::{array::Array, variant::Variant};

type Body = Rc<RefCell<IndexMap<Arc<str>, Variant>>>;

/// A value-typed handle over a shared, insertion-ordered mapping from
/// strings to variants.
///
/// Sharing works as for [`Array`]: copying the handle aliases the body,
/// equality is body identity, and a bodiless handle reads as empty until
/// the first write materialises a body. Iteration follows insertion
/// order; removal keeps the remaining order intact.
///
/// # Examples
///
/// ```
/// use jsonvar::Object;
///
/// let mut o = Object::new();
/// o.set("a", 1);
/// let mut p = o.clone();
/// p.set("a", 2);
/// assert_eq!(o.get("a").as_long(), 2);
///
/// assert!(o.get("missing").is_null());
/// assert!(!o.contains_key("missing"));
/// o.at("missing");
/// assert!(o.contains_key("missing"));
/// ```
#[derive(Clone, Default)]
pub struct Object {
    body: Option<Body>,
}

impl Object {
    /// Creates a handle with no body yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub(crate) fn from_entries(entries: Vec<(Arc<str>, Variant)>) -> Self {
        Self {
            body: Some(Rc::new(RefCell::new(entries.into_iter().collect()))),
        }
    }

    fn body_mut(&mut self) -> Body {
        Rc::clone(
            self.body
                .get_or_insert_with(|| Rc::new(RefCell::new(IndexMap::new()))),
        )
    }

    /// Number of entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.body.as_ref().map_or(0, |b| b.borrow().len())
    }

    /// Returns `true` if the object holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.body
            .as_ref()
            .is_some_and(|b| b.borrow().contains_key(key))
    }

    /// The keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<Arc<str>> {
        self.body
            .as_ref()
            .map_or_else(Vec::new, |b| b.borrow().keys().cloned().collect())
    }

    /// The values in insertion order. The yielded variants alias the
    /// slots.
    #[must_use]
    pub fn values(&self) -> Vec<Variant> {
        self.body
            .as_ref()
            .map_or_else(Vec::new, |b| b.borrow().values().cloned().collect())
    }

    /// Reads without inserting: a Null variant is returned for an absent
    /// key and the object is left untouched.
    #[must_use]
    pub fn get(&self, key: &str) -> Variant {
        self.body
            .as_ref()
            .and_then(|b| b.borrow().get(key).cloned())
            .unwrap_or_default()
    }

    /// Indexed read: an absent key has a Null variant inserted under it
    /// first, then the slot is returned.
    pub fn at(&mut self, key: impl Into<Arc<str>>) -> Variant {
        let body = self.body_mut();
        let mut map = body.borrow_mut();
        map.entry(key.into()).or_insert_with(Variant::new).clone()
    }

    /// Insert-or-replace.
    ///
    /// When the key already holds a slot, the slot variant is assigned in
    /// place, so references to it obtained earlier keep observing the
    /// current value.
    pub fn set(&mut self, key: impl Into<Arc<str>>, value: impl Into<Variant>) {
        let key = key.into();
        let value = value.into();
        let body = self.body_mut();
        let existing = body.borrow().get(&key).cloned();
        match existing {
            Some(slot) => slot.assign(value),
            None => {
                body.borrow_mut().insert(key, value);
            }
        }
    }

    /// Inserts a new entry. Returns `false`, changing nothing, when the
    /// key is already present.
    pub fn add(&mut self, key: impl Into<Arc<str>>, value: impl Into<Variant>) -> bool {
        let key = key.into();
        let body = self.body_mut();
        let mut map = body.borrow_mut();
        if map.contains_key(&key) {
            return false;
        }
        map.insert(key, value.into());
        true
    }

    /// Removes the entry under `key`, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Variant> {
        let body = self.body.as_ref()?;
        let mut map = body.borrow_mut();
        map.shift_remove(key)
    }

    /// Empties the shared body in place; every aliasing handle observes
    /// the empty object.
    pub fn clear(&mut self) {
        if let Some(body) = &self.body {
            body.borrow_mut().clear();
        }
    }

    /// Projects the object onto an array when every key parses as a
    /// non-negative integer.
    ///
    /// The slot at each parsed index aliases the corresponding value;
    /// indices nothing maps to are filled with fresh Null variants, and a
    /// key repeated at the same index keeps the later value. Returns
    /// `None` when any key is not an index.
    #[must_use]
    pub fn try_convert_to_array(&self) -> Option<Array> {
        let mut pairs: Vec<(usize, Variant)> = Vec::with_capacity(self.count());
        for (key, value) in self.iter() {
            let index = parse_index(&key)?;
            pairs.push((index, value));
        }
        let len = pairs.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
        let mut items: Vec<Variant> = Vec::new();
        items.resize_with(len, Variant::new);
        for (index, value) in pairs {
            items[index] = value;
        }
        Some(Array::from(items))
    }

    /// Returns `true` if the object is empty or has a single entry whose
    /// value is not a container. The emitter keeps simple objects on one
    /// line under the `Simple` whitespace policy.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        match self.count() {
            0 => true,
            1 => !self.values()[0].is_composite(),
            _ => false,
        }
    }

    /// Deep clone: a fresh body whose values are recursive duplicates.
    #[must_use]
    pub fn duplicate(&self) -> Object {
        match &self.body {
            None => Object::new(),
            Some(body) => {
                let entries = body
                    .borrow()
                    .iter()
                    .map(|(k, v)| (Arc::clone(k), v.duplicate()))
                    .collect();
                Object::from_entries(entries)
            }
        }
    }

    /// Key-wise structural equality bounded by `max_depth`, insensitive
    /// to entry order; see [`Variant::equivalent`].
    #[must_use]
    pub fn equivalent(&self, other: &Object, max_depth: usize) -> bool {
        if self == other {
            return true;
        }
        if self.count() != other.count() {
            return false;
        }
        self.iter().all(|(key, value)| {
            other.contains_key(&key) && value.equivalent(&other.get(&key), max_depth)
        })
    }

    /// Iterates over a snapshot of the entries in insertion order. The
    /// yielded variants alias the slots.
    #[must_use]
    pub fn iter(&self) -> std::vec::IntoIter<(Arc<str>, Variant)> {
        self.body
            .as_ref()
            .map_or_else(Vec::new, |b| {
                b.borrow()
                    .iter()
                    .map(|(k, v)| (Arc::clone(k), v.clone()))
                    .collect()
            })
            .into_iter()
    }
}

fn parse_index(key: &str) -> Option<usize> {
    let view = crate::view::ByteView::from(key);
    let (value, consumed) = view.parse_i64();
    (consumed == view.len() && consumed > 0 && value >= 0).then_some(value as usize)
}

impl PartialEq for Object {
    /// Handle equality: `true` iff both handles reference the same body.
    fn eq(&self, other: &Self) -> bool {
        match (&self.body, &other.body) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl IntoIterator for &Object {
    type Item = (Arc<str>, Variant);
    type IntoIter = std::vec::IntoIter<(Arc<str>, Variant)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.iter() {
            map.entry(&&*key, &value);
        }
        map.finish()
    }
}
