//! Tabs: named pre-filters over the resident items.
//!
//! Exactly one tab is active whenever tabs are configured. Switching tabs
//! only changes which items pass the first pipeline stage; it never touches
//! selection or input text.

use std::fmt;
use std::sync::Arc;

use crate::error::{AutocompleteError, Result};

/// Predicate deciding whether an item belongs to a tab.
pub type TabFilterFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A tab definition.
pub struct Tab<T> {
    key: String,
    label: String,
    filter: Option<TabFilterFn<T>>,
}

impl<T> Tab<T> {
    /// Create a tab that shows every item.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            filter: None,
        }
    }

    /// Restrict the tab to items passing `filter`.
    pub fn with_filter(mut self, filter: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// The tab's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The tab's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether `item` belongs to this tab. Tabs without a filter accept everything.
    pub fn accepts(&self, item: &T) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(item))
    }

    /// Number of `items` belonging to this tab.
    pub fn count_matches(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.accepts(item)).count()
    }
}

impl<T> Clone for Tab<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<T> fmt::Debug for Tab<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

/// Per-tab state exposed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TabState {
    /// Whether this is the active tab.
    pub selected: bool,
    /// Tabs are never disabled; kept so renderers can treat tabs like options.
    pub disabled: bool,
    /// How many resident items this tab would show.
    pub item_count: usize,
}

/// Resolve the initially active tab.
///
/// No tabs means no active tab. Otherwise the tab named by `default_key`, or
/// the first tab when no key is given.
pub fn initial_tab<T>(tabs: &[Tab<T>], default_key: Option<&str>) -> Result<Option<usize>> {
    if tabs.is_empty() {
        return Ok(None);
    }
    match default_key {
        None => Ok(Some(0)),
        Some(key) => tabs
            .iter()
            .position(|tab| tab.key == key)
            .map(Some)
            .ok_or_else(|| AutocompleteError::UnknownTabKey(key.to_string())),
    }
}

/// The tab after `current`, wrapping around.
pub fn next_tab(current: usize, count: usize) -> usize {
    (current + 1) % count
}

/// The tab before `current`, wrapping around.
pub fn previous_tab(current: usize, count: usize) -> usize {
    (current + count - 1) % count
}
