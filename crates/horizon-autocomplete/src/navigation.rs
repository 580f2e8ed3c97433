//! Keyboard navigation, focus and open-state transitions.
//!
//! The active entry moves over the flattened sequence and wraps at both
//! ends. Left/Right cycle tabs. Every key handled here except
//! [`NavigationKey::Tab`] asks the host to suppress its default behaviour.

use horizon_autocomplete_core::logging::targets;

use crate::engine::{Autocomplete, AutocompleteItem};
use crate::error::{AutocompleteError, Result};
use crate::filtering::AsyncChannel;
use crate::item::Entry;
use crate::tabs::{next_tab, previous_tab};

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKey {
    /// Move to the next entry, opening the list if closed.
    ArrowDown,
    /// Move to the previous entry, opening the list if closed.
    ArrowUp,
    /// Switch to the next tab.
    ArrowRight,
    /// Switch to the previous tab.
    ArrowLeft,
    /// Commit the active entry.
    Enter,
    /// Close the list.
    Escape,
    /// Close the list and let focus move on.
    Tab,
}

impl NavigationKey {
    /// Parse a DOM-style key name (`"ArrowDown"`, `"Enter"`, ...).
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowDown" => Some(Self::ArrowDown),
            "ArrowUp" => Some(Self::ArrowUp),
            "ArrowRight" => Some(Self::ArrowRight),
            "ArrowLeft" => Some(Self::ArrowLeft),
            "Enter" => Some(Self::Enter),
            "Escape" => Some(Self::Escape),
            "Tab" => Some(Self::Tab),
            _ => None,
        }
    }

    /// Whether the host should suppress its default handling of this key.
    pub fn prevents_default(self) -> bool {
        !matches!(self, Self::Tab)
    }
}

/// The result of handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    /// Whether the host should suppress its default handling.
    pub prevent_default: bool,
}

/// Index after `current` in a sequence of `len`, wrapping to the start.
///
/// A `current` of `None` (nothing active) yields the first index.
pub fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(index) if index + 1 < len => index + 1,
        _ => 0,
    })
}

/// Index before `current` in a sequence of `len`, wrapping to the end.
///
/// A `current` of `None` (nothing active) yields the last index.
pub fn previous_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(index) if index > 0 && index < len => index - 1,
        _ => len - 1,
    })
}

impl<T: AutocompleteItem> Autocomplete<T> {
    /// Handle a navigation key.
    #[tracing::instrument(skip(self), target = "horizon_autocomplete::navigation", level = "trace")]
    pub fn handle_key(&mut self, key: NavigationKey) -> KeyOutcome {
        match key {
            NavigationKey::ArrowDown => self.move_active(true),
            NavigationKey::ArrowUp => self.move_active(false),
            NavigationKey::ArrowRight => self.cycle_tab(true),
            NavigationKey::ArrowLeft => self.cycle_tab(false),
            NavigationKey::Enter => self.commit_active(),
            NavigationKey::Escape | NavigationKey::Tab => self.dismiss(),
        }
        self.recompute();
        KeyOutcome {
            prevent_default: key.prevents_default(),
        }
    }

    fn move_active(&mut self, forward: bool) {
        let len = self.view.len();

        if !self.open.get() {
            if !self.can_open() {
                tracing::trace!(target: targets::NAVIGATION, "empty list stays closed");
                return;
            }
            self.open.request(true);
            let index = if forward {
                next_index(None, len)
            } else {
                previous_index(None, len)
            };
            self.activate_index(index);
            return;
        }

        let current = self.highlighted_index();
        let index = if forward {
            next_index(current, len)
        } else {
            previous_index(current, len)
        };
        self.activate_index(index);
    }

    fn activate_index(&mut self, index: Option<usize>) {
        if let Some(index) = index
            && let Some(entry) = self.view.get(index).cloned()
        {
            self.set_active_pair(Some(entry), Some(index));
        }
    }

    fn cycle_tab(&mut self, forward: bool) {
        let count = self.tabs.len();
        let Some(current) = self.active_tab else {
            return;
        };
        let next = if forward {
            next_tab(current, count)
        } else {
            previous_tab(current, count)
        };
        tracing::debug!(target: targets::NAVIGATION, from = current, to = next, "switching tab");
        self.active_tab = Some(next);
    }

    fn commit_active(&mut self) {
        match self.active_item() {
            Some(Entry::Action(action)) => {
                tracing::debug!(target: targets::NAVIGATION, label = action.label(), "triggering action");
                action.trigger();
            }
            Some(Entry::Item(item)) => self.select(item),
            None => {}
        }
    }

    fn dismiss(&mut self) {
        self.open.request(false);
        self.set_active_pair(None, None);
    }

    /// Activate the tab at `index` (e.g. clicked).
    pub fn select_tab(&mut self, index: usize) -> Result<()> {
        let count = self.tabs.len();
        if index >= count {
            return Err(AutocompleteError::TabIndexOutOfRange { index, count });
        }
        self.active_tab = Some(index);
        self.recompute();
        Ok(())
    }

    /// Activate the tab with `key`.
    pub fn select_tab_by_key(&mut self, key: &str) -> Result<()> {
        let index = self
            .tabs
            .iter()
            .position(|tab| tab.key() == key)
            .ok_or_else(|| AutocompleteError::UnknownTabKey(key.to_string()))?;
        self.select_tab(index)
    }

    /// A pointer went down outside the widget.
    ///
    /// Closes the list and clears the active entry. The input text is left
    /// as typed; it is not reset to the committed selection.
    pub fn pointer_down_outside(&mut self) {
        self.open.request(false);
        self.set_active_pair(None, None);
        self.recompute();
    }

    /// The input gained focus.
    ///
    /// Re-issues the async filter for the current text, opens the list if it
    /// may open and activates the first entry when nothing is active.
    pub fn focus(&mut self) {
        self.focused = true;
        let text = self.input_value.get();
        self.issue_filter(&text);

        if self.can_open() {
            self.open.request(true);
            if self.active_item().is_none() {
                self.activate_index(next_index(None, self.view.len()));
            }
        }
        self.recompute();
    }

    /// The input lost focus. Runs the blur hook, if any.
    pub fn blur(&mut self) {
        self.focused = false;
        if let Some(hook) = &self.on_blur {
            let text = self.input_value.get();
            self.controller.issue_hook(AsyncChannel::Blur, hook, &text);
        }
        self.recompute();
    }

    /// The disclosure control was pressed.
    ///
    /// Closes an open list (clearing the active entry), or opens a closed one
    /// if it may open.
    pub fn toggle_open(&mut self) {
        if self.open.get() {
            self.dismiss();
        } else if self.can_open() {
            self.open.request(true);
        }
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutocompleteConfig;
    use crate::item::ActionItem;
    use crate::tabs::Tab;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fruits() -> Autocomplete<String> {
        Autocomplete::new(AutocompleteConfig::for_strings(["Apple", "Banana", "Cherry"])).unwrap()
    }

    fn item(s: &str) -> Option<Entry<String>> {
        Some(Entry::Item(s.to_string()))
    }

    #[test]
    fn test_index_helpers() {
        assert_eq!(next_index(None, 3), Some(0));
        assert_eq!(next_index(Some(1), 3), Some(2));
        assert_eq!(next_index(Some(2), 3), Some(0));
        assert_eq!(previous_index(None, 3), Some(2));
        assert_eq!(previous_index(Some(0), 3), Some(2));
        assert_eq!(previous_index(Some(2), 3), Some(1));
        assert_eq!(next_index(None, 0), None);
        assert_eq!(previous_index(Some(0), 0), None);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(NavigationKey::from_key_name("ArrowDown"), Some(NavigationKey::ArrowDown));
        assert_eq!(NavigationKey::from_key_name("Space"), None);
        assert!(NavigationKey::Escape.prevents_default());
        assert!(!NavigationKey::Tab.prevents_default());
    }

    #[test]
    fn test_arrow_up_opens_on_last() {
        let mut autocomplete = fruits();
        let outcome = autocomplete.handle_key(NavigationKey::ArrowUp);
        assert!(outcome.prevent_default);
        assert!(autocomplete.is_open());
        assert_eq!(autocomplete.active_item(), item("Cherry"));

        autocomplete.handle_key(NavigationKey::ArrowUp);
        assert_eq!(autocomplete.active_item(), item("Banana"));
    }

    #[test]
    fn test_escape_and_tab_close_without_touching_text() {
        let mut autocomplete = fruits();
        autocomplete.set_input_value("typed");
        autocomplete.handle_key(NavigationKey::ArrowDown);
        assert!(autocomplete.is_open());

        autocomplete.handle_key(NavigationKey::Escape);
        assert!(!autocomplete.is_open());
        assert_eq!(autocomplete.active_item(), None);
        assert_eq!(autocomplete.input_value(), "typed");

        autocomplete.handle_key(NavigationKey::ArrowDown);
        let outcome = autocomplete.handle_key(NavigationKey::Tab);
        assert!(!outcome.prevent_default);
        assert!(!autocomplete.is_open());
        assert_eq!(autocomplete.highlighted_index(), None);
    }

    #[test]
    fn test_enter_triggers_action() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let config = AutocompleteConfig::for_strings(["Apple", "Banana"]).with_action(
            ActionItem::new("Create", move || {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let mut autocomplete = Autocomplete::new(config).unwrap();

        autocomplete.handle_key(NavigationKey::ArrowUp);
        assert!(autocomplete.active_item().is_some_and(|entry| entry.is_action()));

        autocomplete.handle_key(NavigationKey::Enter);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!autocomplete.has_selection());
    }

    #[test]
    fn test_enter_without_active_does_nothing() {
        let mut autocomplete = fruits();
        autocomplete.handle_key(NavigationKey::Enter);
        assert!(!autocomplete.has_selection());
        assert!(!autocomplete.is_open());
    }

    #[test]
    fn test_arrows_cycle_tabs() {
        let config = AutocompleteConfig::for_strings(["a1", "b1", "b2"])
            .with_tab(Tab::new("a", "A").with_filter(|s: &String| s.starts_with('a')))
            .with_tab(Tab::new("b", "B").with_filter(|s: &String| s.starts_with('b')));
        let mut autocomplete = Autocomplete::new(config).unwrap();
        assert_eq!(autocomplete.active_tab_index(), Some(0));

        autocomplete.handle_key(NavigationKey::ArrowRight);
        assert_eq!(autocomplete.active_tab_index(), Some(1));
        assert_eq!(autocomplete.flattened_items().len(), 2);

        autocomplete.handle_key(NavigationKey::ArrowRight);
        assert_eq!(autocomplete.active_tab_index(), Some(0));

        autocomplete.handle_key(NavigationKey::ArrowLeft);
        assert_eq!(autocomplete.active_tab_index(), Some(1));
        assert!(!autocomplete.is_open());
    }

    #[test]
    fn test_arrows_without_tabs_are_harmless() {
        let mut autocomplete = fruits();
        let outcome = autocomplete.handle_key(NavigationKey::ArrowLeft);
        assert!(outcome.prevent_default);
        assert_eq!(autocomplete.active_tab_index(), None);
    }

    #[test]
    fn test_select_tab_bounds() {
        let config = AutocompleteConfig::for_strings(["a"]).with_tab(Tab::new("all", "All"));
        let mut autocomplete = Autocomplete::new(config).unwrap();
        assert_eq!(
            autocomplete.select_tab(4),
            Err(AutocompleteError::TabIndexOutOfRange { index: 4, count: 1 })
        );
        assert!(autocomplete.select_tab_by_key("all").is_ok());
        assert!(autocomplete.select_tab_by_key("none").is_err());
    }

    #[test]
    fn test_focus_opens_and_activates_first() {
        let mut autocomplete = fruits();
        autocomplete.focus();
        assert!(autocomplete.is_focused());
        assert!(autocomplete.is_open());
        assert_eq!(autocomplete.active_item(), item("Apple"));

        autocomplete.blur();
        assert!(!autocomplete.is_focused());
        assert!(autocomplete.is_open());
    }

    #[test]
    fn test_toggle_open() {
        let mut autocomplete = fruits();
        autocomplete.toggle_open();
        assert!(autocomplete.is_open());
        assert_eq!(autocomplete.active_item(), None);

        autocomplete.handle_key(NavigationKey::ArrowDown);
        autocomplete.toggle_open();
        assert!(!autocomplete.is_open());
        assert_eq!(autocomplete.active_item(), None);
    }

    #[test]
    fn test_toggle_respects_empty_gate() {
        let mut autocomplete =
            Autocomplete::new(AutocompleteConfig::for_strings(Vec::<String>::new())).unwrap();
        autocomplete.toggle_open();
        assert!(!autocomplete.is_open());
    }
}
