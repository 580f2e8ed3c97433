//! Controlled/uncontrolled state resolution.
//!
//! Every piece of interaction state (input text, selection, open flag,
//! active entry, highlighted index) lives in a [`StateSlice`]. A slice is
//! either owned by the engine (uncontrolled, backed by a [`Property`]) or
//! owned by the caller (controlled): the caller supplies the current value and
//! a setter, and the engine only ever *requests* changes through the setter.
//!
//! The rest of the engine sees only [`StateSlice::get`] and
//! [`StateSlice::request`], never which mode a slice is in. A controlled
//! request is not visible until the caller feeds the new value back with
//! [`StateSlice::sync`], so transitions must not read back what they just
//! requested.

use std::fmt;
use std::sync::Arc;

use horizon_autocomplete_core::logging::targets;
use horizon_autocomplete_core::Property;

/// A change request callback for one state slice.
pub type Setter<V> = Arc<dyn Fn(V) + Send + Sync>;

/// A caller-owned value together with the setter the engine calls to change it.
pub struct Controlled<V> {
    value: V,
    setter: Setter<V>,
}

impl<V> Controlled<V> {
    /// Hand a slice to the engine in controlled mode.
    pub fn new(value: V, setter: impl Fn(V) + Send + Sync + 'static) -> Self {
        Self {
            value,
            setter: Arc::new(setter),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Controlled<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controlled")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// One resolved piece of state.
pub struct StateSlice<V> {
    name: &'static str,
    internal: Property<V>,
    external: Option<V>,
    setter: Option<Setter<V>>,
    /// Last value forwarded to the setter and not yet synced back.
    requested: Property<Option<V>>,
}

impl<V> StateSlice<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create an engine-owned slice.
    pub fn uncontrolled(name: &'static str, initial: V) -> Self {
        Self {
            name,
            internal: Property::new(initial),
            external: None,
            setter: None,
            requested: Property::new(None),
        }
    }

    /// Create a caller-owned slice.
    pub fn controlled(name: &'static str, controlled: Controlled<V>) -> Self {
        Self {
            name,
            internal: Property::new(controlled.value.clone()),
            external: Some(controlled.value),
            setter: Some(controlled.setter),
            requested: Property::new(None),
        }
    }

    /// Create a slice from optional controlled configuration.
    pub fn resolve(name: &'static str, initial: V, controlled: Option<Controlled<V>>) -> Self {
        match controlled {
            Some(controlled) => Self::controlled(name, controlled),
            None => Self::uncontrolled(name, initial),
        }
    }

    /// Whether the caller owns this slice.
    pub fn is_controlled(&self) -> bool {
        self.external.is_some()
    }

    /// Whether `value` was requested from the caller and not synced back yet.
    ///
    /// Always `false` for uncontrolled slices.
    pub fn is_pending(&self, value: &V) -> bool {
        self.requested.with(|requested| requested.as_ref() == Some(value))
    }

    /// The current value.
    pub fn get(&self) -> V {
        match &self.external {
            Some(value) => value.clone(),
            None => self.internal.get(),
        }
    }

    /// Access the current value without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&V) -> R,
    {
        match &self.external {
            Some(value) => f(value),
            None => self.internal.with(f),
        }
    }

    /// Request a new value.
    ///
    /// Uncontrolled slices update immediately. Controlled slices forward the
    /// request to the caller's setter and keep reporting the old value until
    /// the caller calls [`sync`](Self::sync). Returns `true` if the request
    /// differs from the current value.
    pub fn request(&self, value: V) -> bool {
        match (&self.external, &self.setter) {
            (Some(current), Some(setter)) => {
                let changed = *current != value;
                tracing::trace!(target: targets::STATE, slice = self.name, changed, "forwarding controlled change");
                self.requested.set(Some(value.clone()));
                setter(value);
                changed
            }
            _ => {
                let changed = self.internal.set(value);
                if changed {
                    tracing::trace!(target: targets::STATE, slice = self.name, "uncontrolled value changed");
                }
                changed
            }
        }
    }

    /// Feed in the caller's current value.
    ///
    /// For uncontrolled slices this overwrites the engine-owned value.
    pub fn sync(&mut self, value: V) {
        match &mut self.external {
            Some(current) => {
                *current = value;
                self.requested.set(None);
            }
            None => self.internal.set_silent(value),
        }
    }
}

impl<V: Clone + fmt::Debug> fmt::Debug for StateSlice<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match &self.external {
            Some(value) => value.clone(),
            None => self.internal.get(),
        };
        f.debug_struct("StateSlice")
            .field("name", &self.name)
            .field("controlled", &self.external.is_some())
            .field("value", &value)
            .finish()
    }
}
