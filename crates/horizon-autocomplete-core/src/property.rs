//! Property system for Horizon Autocomplete.
//!
//! This module provides the change-detecting cells that back every piece of
//! engine-owned ("uncontrolled") state: input text, selection, open flag,
//! active entry and highlighted index. A property only stores a value and
//! reports whether a write actually changed it; emitting notifications is
//! left to the owner.
//!
//! # Example
//!
//! ```
//! use horizon_autocomplete_core::property::Property;
//! use horizon_autocomplete_core::signal::Signal;
//!
//! struct OpenState {
//!     open: Property<bool>,
//!     open_changed: Signal<bool>,
//! }
//!
//! impl OpenState {
//!     fn set_open(&self, open: bool) {
//!         if self.open.set(open) {
//!             self.open_changed.emit(open);
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A reactive property that tracks changes.
///
/// `Property<T>` wraps a value and provides change detection. When `set()` is
/// called, it compares the new value with the current one and returns whether
/// the value actually changed.
///
/// # Thread Safety
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// when `T` is.
///
/// # Example
///
/// ```
/// use horizon_autocomplete_core::Property;
///
/// let text = Property::new(String::from("ap"));
/// assert_eq!(text.get(), "ap");
///
/// // Setting same value returns false (no change)
/// assert!(!text.set(String::from("ap")));
///
/// // Setting different value returns true (changed)
/// assert!(text.set(String::from("app")));
/// assert_eq!(text.get(), "app");
/// ```
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For collections, consider using `with()` instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// If the new value equals the current one, the value is not updated and
    /// `false` is returned.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}
