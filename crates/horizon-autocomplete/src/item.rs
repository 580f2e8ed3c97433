//! Entries of the navigable sequence.
//!
//! Real items are opaque caller values; the engine only ever looks at them
//! through projections supplied in the configuration. Action rows are a
//! separate variant of [`Entry`] so every consumer must say what it does with
//! each kind.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Counter for generating unique action IDs.
static NEXT_ACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Selection mode of an autocomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// At most one selected item; selecting replaces.
    #[default]
    Single,
    /// An ordered set of selected items; selecting toggles membership.
    Multiple,
}

impl Mode {
    /// The lowercase name used in attribute bundles.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
        }
    }
}

/// Where an action row is placed relative to the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    /// Before all items.
    Top,
    /// After all items.
    #[default]
    Bottom,
}

/// Unique identifier of an [`ActionItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(u64);

impl ActionId {
    fn next() -> Self {
        Self(NEXT_ACTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// A non-data row woven into the list, such as "Create new…".
///
/// Action rows never take part in selection, grouping or filtering. Two
/// handles are equal when they were cloned from the same action.
#[derive(Clone)]
pub struct ActionItem {
    id: ActionId,
    label: String,
    on_action: Arc<dyn Fn() + Send + Sync>,
    placement: Placement,
    show_when_empty: bool,
}

impl ActionItem {
    /// Create an action placed at the bottom of the list.
    pub fn new(label: impl Into<String>, on_action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            id: ActionId::next(),
            label: label.into(),
            on_action: Arc::new(on_action),
            placement: Placement::Bottom,
            show_when_empty: false,
        }
    }

    /// Set the placement using builder pattern.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Only show this action when there are no items to show.
    pub fn with_show_when_empty(mut self, show_when_empty: bool) -> Self {
        self.show_when_empty = show_when_empty;
        self
    }

    /// The action's unique ID.
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// The label shown for this row.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Where the row is placed.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Whether the row is hidden while there are items.
    pub fn show_when_empty(&self) -> bool {
        self.show_when_empty
    }

    /// Invoke the action callback.
    pub fn trigger(&self) {
        (self.on_action)();
    }
}

impl PartialEq for ActionItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ActionItem {}

impl fmt::Debug for ActionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionItem")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("placement", &self.placement)
            .field("show_when_empty", &self.show_when_empty)
            .finish()
    }
}

/// One row of the flattened sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    /// A caller item (possibly the synthetic custom value).
    Item(T),
    /// An action row.
    Action(ActionItem),
}

impl<T> Entry<T> {
    /// The caller item, if this is one.
    pub fn as_item(&self) -> Option<&T> {
        match self {
            Self::Item(item) => Some(item),
            Self::Action(_) => None,
        }
    }

    /// The action row, if this is one.
    pub fn as_action(&self) -> Option<&ActionItem> {
        match self {
            Self::Item(_) => None,
            Self::Action(action) => Some(action),
        }
    }

    /// Whether this is an action row.
    pub fn is_action(&self) -> bool {
        matches!(self, Self::Action(_))
    }
}

/// Where an option rendered as a link points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionLink {
    /// A plain URL.
    Href(String),
    /// Arbitrary link attributes for router-style links.
    Props(BTreeMap<String, String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_action_identity() {
        let a = ActionItem::new("Create", || {});
        let b = ActionItem::new("Create", || {});
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(a.id().as_u64() < b.id().as_u64());
    }

    #[test]
    fn test_action_builder_defaults() {
        let action = ActionItem::new("Browse all", || {});
        assert_eq!(action.placement(), Placement::Bottom);
        assert!(!action.show_when_empty());

        let action = action
            .with_placement(Placement::Top)
            .with_show_when_empty(true);
        assert_eq!(action.placement(), Placement::Top);
        assert!(action.show_when_empty());
        assert_eq!(action.label(), "Browse all");
    }

    #[test]
    fn test_action_trigger() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let action = ActionItem::new("Add", move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        action.trigger();
        action.clone().trigger();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_entry_accessors() {
        let item: Entry<&str> = Entry::Item("Apple");
        assert_eq!(item.as_item(), Some(&"Apple"));
        assert!(item.as_action().is_none());
        assert!(!item.is_action());

        let action: Entry<&str> = Entry::Action(ActionItem::new("Add", || {}));
        assert!(action.as_item().is_none());
        assert!(action.is_action());
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(Mode::Multiple.as_str(), "multiple");
        assert_eq!(Mode::default(), Mode::Single);
    }
}
