//! String interning keyed by views.
//!
//! Parsing the same key or value text twice should not materialise two
//! copies of the same string. The cache maps a view (either alphabet) to
//! an interned `Arc<str>`; the second lookup with content-equal units
//! hands back the same allocation. An override table lets a caller bind a
//! view to an explicit replacement, which is how escaped string slices
//! are published under their raw, undecoded spelling.
//!
//! Two variants exist. [`TempStringCache`] does no locking and is meant
//! to live for a single parse call. [`SharedStringCache`] serialises all
//! operations under one mutex and can back any number of parses across
//! threads; throughput is explicitly not a goal.

use std::sync::{Arc, Mutex};

use ahash::AHashMap;

use crate::view::{ByteView, CharView};

/// Tuning knobs shared by both cache variants.
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Views longer than this many units are never interned, in either
    /// direction; `get` simply materialises a fresh string for them.
    pub max_len: usize,
    /// When `true`, keys are copied onto minimal backing buffers so the
    /// cache does not pin the parse input they were sliced from.
    pub shrink: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_len: 512,
            shrink: false,
        }
    }
}

/// The cache contract used by the parsers.
///
/// The unit and byte tables are independent: interning a spelling under
/// one alphabet says nothing about the other.
pub trait StringCache {
    /// Returns the interned string for `view`, interning it first if
    /// needed. Views longer than the configured maximum are materialised
    /// without being recorded.
    fn get_units(&mut self, view: &CharView) -> Arc<str>;

    /// Returns the binding for `view` if one exists, without interning.
    fn try_get_units(&self, view: &CharView) -> Option<Arc<str>>;

    /// Binds `view` to an explicit replacement; later `get_units` calls
    /// return `value`. Oversized views are ignored.
    fn set_units(&mut self, view: &CharView, value: Arc<str>);

    /// Byte-alphabet counterpart of [`StringCache::get_units`].
    fn get_bytes(&mut self, view: &ByteView) -> Arc<str>;

    /// Byte-alphabet counterpart of [`StringCache::try_get_units`].
    fn try_get_bytes(&self, view: &ByteView) -> Option<Arc<str>>;

    /// Byte-alphabet counterpart of [`StringCache::set_units`].
    fn set_bytes(&mut self, view: &ByteView, value: Arc<str>);
}

/// Interned bindings plus explicit overrides, per alphabet.
///
/// Overrides live in their own tables so a `set` never evicts an
/// interned binding; once interned, a binding is stable for the life of
/// the cache.
#[derive(Debug, Default)]
struct Tables {
    units: AHashMap<CharView, Arc<str>>,
    unit_overrides: AHashMap<CharView, Arc<str>>,
    bytes: AHashMap<ByteView, Arc<str>>,
    byte_overrides: AHashMap<ByteView, Arc<str>>,
}

impl Tables {
    fn get_units(&mut self, view: &CharView, options: &CacheOptions) -> Arc<str> {
        if let Some(found) = self.unit_overrides.get(view) {
            return Arc::clone(found);
        }
        if view.len() > options.max_len {
            return view.to_string_lossy().into();
        }
        if let Some(found) = self.units.get(view) {
            return Arc::clone(found);
        }
        let value: Arc<str> = view.to_string_lossy().into();
        let key = if options.shrink {
            view.detached()
        } else {
            view.clone()
        };
        self.units.insert(key, Arc::clone(&value));
        value
    }

    fn try_get_units(&self, view: &CharView) -> Option<Arc<str>> {
        self.unit_overrides
            .get(view)
            .or_else(|| self.units.get(view))
            .map(Arc::clone)
    }

    fn set_units(&mut self, view: &CharView, value: Arc<str>, options: &CacheOptions) {
        if view.len() > options.max_len {
            return;
        }
        let key = if options.shrink {
            view.detached()
        } else {
            view.clone()
        };
        self.unit_overrides.insert(key, value);
    }

    fn get_bytes(&mut self, view: &ByteView, options: &CacheOptions) -> Arc<str> {
        if let Some(found) = self.byte_overrides.get(view) {
            return Arc::clone(found);
        }
        if view.len() > options.max_len {
            return view.to_string_lossy().into();
        }
        if let Some(found) = self.bytes.get(view) {
            return Arc::clone(found);
        }
        let value: Arc<str> = view.to_string_lossy().into();
        let key = if options.shrink {
            view.detached()
        } else {
            view.clone()
        };
        self.bytes.insert(key, Arc::clone(&value));
        value
    }

    fn try_get_bytes(&self, view: &ByteView) -> Option<Arc<str>> {
        self.byte_overrides
            .get(view)
            .or_else(|| self.bytes.get(view))
            .map(Arc::clone)
    }

    fn set_bytes(&mut self, view: &ByteView, value: Arc<str>, options: &CacheOptions) {
        if view.len() > options.max_len {
            return;
        }
        let key = if options.shrink {
            view.detached()
        } else {
            view.clone()
        };
        self.byte_overrides.insert(key, value);
    }
}

/// An unlocked cache for use within a single parse call.
#[derive(Debug, Default)]
pub struct TempStringCache {
    tables: Tables,
    options: CacheOptions,
}

impl TempStringCache {
    /// Creates an empty cache with default options. Temporary caches do
    /// not shrink keys: they die with the parse call, so pinning its
    /// input is harmless.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache with explicit options.
    #[must_use]
    pub fn with_options(options: CacheOptions) -> Self {
        Self {
            tables: Tables::default(),
            options,
        }
    }
}

impl StringCache for TempStringCache {
    fn get_units(&mut self, view: &CharView) -> Arc<str> {
        self.tables.get_units(view, &self.options)
    }

    fn try_get_units(&self, view: &CharView) -> Option<Arc<str>> {
        self.tables.try_get_units(view)
    }

    fn set_units(&mut self, view: &CharView, value: Arc<str>) {
        self.tables.set_units(view, value, &self.options);
    }

    fn get_bytes(&mut self, view: &ByteView) -> Arc<str> {
        self.tables.get_bytes(view, &self.options)
    }

    fn try_get_bytes(&self, view: &ByteView) -> Option<Arc<str>> {
        self.tables.try_get_bytes(view)
    }

    fn set_bytes(&mut self, view: &ByteView, value: Arc<str>) {
        self.tables.set_bytes(view, value, &self.options);
    }
}

/// A cache shared across parses and threads, serialised under one mutex.
#[derive(Debug)]
pub struct SharedStringCache {
    tables: Mutex<Tables>,
    options: CacheOptions,
}

impl SharedStringCache {
    /// Creates an empty shared cache. Shared caches shrink their keys by
    /// default so long-lived bindings do not pin parse inputs.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(CacheOptions {
            shrink: true,
            ..CacheOptions::default()
        })
    }

    /// Creates an empty shared cache with explicit options.
    #[must_use]
    pub fn with_options(options: CacheOptions) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            options,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // A panic while holding the lock leaves the tables consistent:
        // every operation inserts at most one complete binding.
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for SharedStringCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StringCache for SharedStringCache {
    fn get_units(&mut self, view: &CharView) -> Arc<str> {
        self.lock().get_units(view, &self.options)
    }

    fn try_get_units(&self, view: &CharView) -> Option<Arc<str>> {
        self.lock().try_get_units(view)
    }

    fn set_units(&mut self, view: &CharView, value: Arc<str>) {
        self.lock().set_units(view, value, &self.options);
    }

    fn get_bytes(&mut self, view: &ByteView) -> Arc<str> {
        self.lock().get_bytes(view, &self.options)
    }

    fn try_get_bytes(&self, view: &ByteView) -> Option<Arc<str>> {
        self.lock().try_get_bytes(view)
    }

    fn set_bytes(&mut self, view: &ByteView, value: Arc<str>) {
        self.lock().set_bytes(view, value, &self.options);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{CacheOptions, SharedStringCache, StringCache, TempStringCache};
    use crate::view::{ByteView, CharView};

    #[test]
    fn second_get_returns_same_allocation() {
        let mut cache = TempStringCache::new();
        let a = cache.get_bytes(&ByteView::from("repeated"));
        let b = cache.get_bytes(&ByteView::from("xx repeated").slice(3, 8));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(&*a, "repeated");
    }

    #[test]
    fn alphabets_are_independent() {
        let mut cache = TempStringCache::new();
        let from_units = cache.get_units(&CharView::from("twin"));
        let from_bytes = cache.get_bytes(&ByteView::from("twin"));
        assert_eq!(from_units, from_bytes);
        assert!(!Arc::ptr_eq(&from_units, &from_bytes));
    }

    #[test]
    fn overrides_win_without_evicting() {
        let mut cache = TempStringCache::new();
        let raw = ByteView::from(r"a\nb");
        let interned = cache.get_bytes(&raw);
        assert_eq!(&*interned, r"a\nb");

        cache.set_bytes(&raw, Arc::from("a\nb"));
        assert_eq!(&*cache.get_bytes(&raw), "a\nb");
        assert_eq!(cache.try_get_bytes(&raw).as_deref(), Some("a\nb"));
    }

    #[test]
    fn oversized_views_are_not_interned() {
        let mut cache = TempStringCache::with_options(CacheOptions {
            max_len: 4,
            shrink: false,
        });
        let long = ByteView::from("longer than four");
        let a = cache.get_bytes(&long);
        let b = cache.get_bytes(&long);
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(cache.try_get_bytes(&long).is_none());

        cache.set_bytes(&long, Arc::from("ignored"));
        assert_eq!(&*cache.get_bytes(&long), "longer than four");
    }

    #[test]
    fn shared_cache_is_stable_across_handles() {
        let mut cache = SharedStringCache::new();
        let first = cache.get_units(&CharView::from("key"));
        let again = cache.get_units(&CharView::from("key"));
        assert!(Arc::ptr_eq(&first, &again));
    }
}
