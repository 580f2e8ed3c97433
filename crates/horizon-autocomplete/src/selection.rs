//! Selection and clearing.

use horizon_autocomplete_core::logging::targets;

use crate::engine::{Autocomplete, AutocompleteItem};
use crate::item::Mode;

/// Toggle `item` in `selection`: remove it if present, else append it.
///
/// Other members keep their order, so toggling twice restores the input.
pub fn toggle_membership<T: Clone + PartialEq>(selection: &[T], item: &T) -> Vec<T> {
    if selection.contains(item) {
        selection.iter().filter(|s| *s != item).cloned().collect()
    } else {
        let mut next = selection.to_vec();
        next.push(item.clone());
        next
    }
}

impl<T: AutocompleteItem> Autocomplete<T> {
    /// Select `item`.
    ///
    /// Disabled items are ignored. In single mode the item replaces the
    /// selection, its display string becomes the input text and the list
    /// closes. In multiple mode the item's membership is toggled and the
    /// input text is cleared; the list stays as it is. Either way
    /// [`item_selected`](Self::item_selected) is emitted and the active entry
    /// is cleared.
    #[tracing::instrument(skip_all, target = "horizon_autocomplete::selection", level = "trace")]
    pub fn select(&mut self, item: T) {
        if self.is_item_disabled(&item) {
            tracing::debug!(target: targets::SELECTION, "ignoring selection of a disabled item");
            return;
        }

        match self.settings.mode {
            Mode::Single => {
                let text = (self.item_to_string)(&item);
                self.selected.request(Some(item.clone()));
                self.request_input(text);
                self.item_selected.emit(item);
                self.open.request(false);
            }
            Mode::Multiple => {
                let next = self
                    .selected_items
                    .with(|selection| toggle_membership(selection, &item));
                tracing::trace!(target: targets::SELECTION, count = next.len(), "toggled membership");
                self.selected_items.request(next);
                self.item_selected.emit(item);
                self.request_input(String::new());
            }
        }

        self.set_active_pair(None, None);
        self.recompute();
    }

    /// Whether the clear control has nothing to clear.
    pub fn is_clear_disabled(&self) -> bool {
        self.input_value.with(String::is_empty) && !self.has_selection()
    }

    /// Clear the input text and the selection, then close the list.
    pub fn clear(&mut self) {
        tracing::debug!(target: targets::SELECTION, "clearing");
        self.request_input(String::new());
        match self.settings.mode {
            Mode::Single => {
                self.selected.request(None);
            }
            Mode::Multiple => {
                self.selected_items.request(Vec::new());
            }
        }
        self.cleared.emit(());
        self.set_active_pair(None, None);
        self.open.request(false);
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutocompleteConfig;
    use crate::navigation::NavigationKey;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn config() -> AutocompleteConfig<String> {
        AutocompleteConfig::for_strings(["Apple", "Banana", "Cherry"])
    }

    #[test]
    fn test_toggle_membership() {
        let start = vec!["a", "b", "c"];
        assert_eq!(toggle_membership(&start, &"b"), vec!["a", "c"]);
        assert_eq!(toggle_membership(&start, &"d"), vec!["a", "b", "c", "d"]);
        let once = toggle_membership(&start, &"d");
        assert_eq!(toggle_membership(&once, &"d"), start);
    }

    #[test]
    fn test_single_select() {
        let mut autocomplete = Autocomplete::new(config()).unwrap();
        let selected = Arc::new(Mutex::new(Vec::new()));
        let selected_clone = selected.clone();
        autocomplete
            .item_selected
            .connect(move |item| selected_clone.lock().push(item.clone()));

        autocomplete.handle_key(NavigationKey::ArrowDown);
        autocomplete.handle_key(NavigationKey::ArrowDown);
        autocomplete.handle_key(NavigationKey::Enter);

        assert_eq!(autocomplete.selected(), Some("Banana".to_string()));
        assert_eq!(autocomplete.input_value(), "Banana");
        assert!(!autocomplete.is_open());
        assert_eq!(autocomplete.active_item(), None);
        assert_eq!(*selected.lock(), vec!["Banana".to_string()]);
        assert!(autocomplete.selected_items().is_empty());
    }

    #[test]
    fn test_multiple_select_keeps_list_open() {
        let mut autocomplete =
            Autocomplete::new(config().with_mode(Mode::Multiple)).unwrap();
        autocomplete.handle_key(NavigationKey::ArrowDown);
        autocomplete.set_input_value("Ch");

        autocomplete.select("Cherry".to_string());
        assert_eq!(autocomplete.selected_items(), vec!["Cherry".to_string()]);
        assert_eq!(autocomplete.input_value(), "");
        assert!(autocomplete.is_open());
        assert_eq!(autocomplete.selected(), None);
        assert!(autocomplete.is_selected(&"Cherry".to_string()));
    }

    #[test]
    fn test_disabled_items_are_ignored() {
        let config = config().with_item_disabled(|item: &String| item == "Banana");
        let mut autocomplete = Autocomplete::new(config).unwrap();
        let emitted = Arc::new(Mutex::new(0));
        let emitted_clone = emitted.clone();
        autocomplete.item_selected.connect(move |_| *emitted_clone.lock() += 1);

        autocomplete.handle_key(NavigationKey::ArrowDown);
        autocomplete.select("Banana".to_string());
        assert_eq!(autocomplete.selected(), None);
        assert!(autocomplete.is_open());
        assert_eq!(*emitted.lock(), 0);
    }

    #[test]
    fn test_clear() {
        let mut autocomplete =
            Autocomplete::new(config().with_mode(Mode::Multiple)).unwrap();
        let cleared = Arc::new(Mutex::new(0));
        let cleared_clone = cleared.clone();
        autocomplete.cleared.connect(move |_| *cleared_clone.lock() += 1);
        assert!(autocomplete.is_clear_disabled());

        autocomplete.select("Apple".to_string());
        autocomplete.select("Banana".to_string());
        autocomplete.set_input_value("Ch");
        autocomplete.handle_key(NavigationKey::ArrowDown);
        assert!(!autocomplete.is_clear_disabled());

        autocomplete.clear();
        assert!(autocomplete.selected_items().is_empty());
        assert_eq!(autocomplete.input_value(), "");
        assert!(!autocomplete.is_open());
        assert_eq!(autocomplete.active_item(), None);
        assert_eq!(*cleared.lock(), 1);
        assert!(autocomplete.is_clear_disabled());
    }

    #[test]
    fn test_clear_enabled_by_text_alone() {
        let mut autocomplete = Autocomplete::new(config()).unwrap();
        autocomplete.set_input_value("x");
        assert!(!autocomplete.is_clear_disabled());
    }
}
