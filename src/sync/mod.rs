//! Shared single-value cells for cross-task state.
//!
//! The polling engine runs each evaluation attempt on its own task, so the
//! attempt and the session driving it need a place to exchange a value.
//! [`ConcurrentBox`] is that place: a mutex-guarded cell whose clones all
//! point at the same storage.
//!
//! # Example
//!
//! ```rust
//! use async_expectations::sync::ConcurrentBox;
//!
//! let cell = ConcurrentBox::new(0);
//! let shared = cell.clone();
//!
//! shared.set(42);
//! assert_eq!(cell.get(), 42);
//! ```

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A thread-safe single-value cell.
///
/// Cloning shares the underlying storage. Every operation takes the lock
/// only for the duration of the access, so a `ConcurrentBox` can be read
/// and written freely from concurrent tasks.
pub struct ConcurrentBox<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> ConcurrentBox<T> {
    /// Create a new cell holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(value)),
        }
    }

    /// Store `value`, dropping the previous contents.
    pub fn set(&self, value: T) {
        *self.inner.lock() = value;
    }

    /// Store `value` and return the previous contents.
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.inner.lock(), value)
    }

    /// Apply `f` to the contents under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl<T: Clone> ConcurrentBox<T> {
    /// Return a clone of the current contents.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.lock().clone()
    }
}

impl<T: Default> ConcurrentBox<T> {
    /// Take the contents, leaving the default value behind.
    #[must_use]
    pub fn take(&self) -> T {
        std::mem::take(&mut *self.inner.lock())
    }
}

impl<T> Clone for ConcurrentBox<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for ConcurrentBox<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for ConcurrentBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConcurrentBox")
            .field(&*self.inner.lock())
            .finish()
    }
}
