//! Lazily recomputed values.
//!
//! [`Cached<T>`] holds a value derived from some other state. Writers of that
//! state call [`Cached::invalidate`]; readers call
//! [`Cached::get_or_update`] with the computation, which only runs when the
//! cache is dirty. The computation is supplied at the read site so it can
//! borrow state the cache itself cannot own.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

/// A cached value that is recomputed on demand after invalidation.
///
/// # Example
///
/// ```
/// use infovis_core::Cached;
///
/// let values = vec![3, 1, 2];
/// let total = Cached::new();
///
/// assert_eq!(total.get_or_update(|| values.iter().sum::<i32>()), 6);
/// total.invalidate();
/// assert!(total.is_dirty());
/// ```
pub struct Cached<T> {
    /// Cached value.
    value: RwLock<Option<T>>,
    /// Whether the cache needs refreshing.
    dirty: AtomicBool,
}

impl<T: Clone> Cached<T> {
    /// Create an empty (dirty) cache.
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
            dirty: AtomicBool::new(true),
        }
    }

    /// Return the cached value, running `compute` first if the cache is dirty.
    pub fn get_or_update<F>(&self, compute: F) -> T
    where
        F: FnOnce() -> T,
    {
        if !self.dirty.load(Ordering::Acquire) {
            if let Some(value) = self.value.read().as_ref() {
                return value.clone();
            }
        }
        let value = compute();
        *self.value.write() = Some(value.clone());
        self.dirty.store(false, Ordering::Release);
        value
    }

    /// Return the cached value without recomputing, if it is fresh.
    pub fn peek(&self) -> Option<T> {
        if self.is_dirty() {
            None
        } else {
            self.value.read().clone()
        }
    }

    /// Mark the cache as dirty, causing recalculation on the next read.
    pub fn invalidate(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Check if the cache needs recalculation.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}

impl<T: Clone> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Cached<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cached")
            .field("dirty", &self.is_dirty())
            .field("value", &*self.value.read())
            .finish()
    }
}
