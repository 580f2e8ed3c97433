//! Engine-wide invariants checked over sequences of interactions.

use std::sync::Arc;

use horizon_autocomplete::prelude::*;
use horizon_autocomplete::selection::toggle_membership;
use parking_lot::Mutex;

fn fruits() -> AutocompleteConfig<String> {
    AutocompleteConfig::for_strings(["Apple", "Apricot", "Banana", "Blueberry", "Cherry"])
        .with_match_mode(MatchMode::Contains, CaseSensitivity::CaseInsensitive)
}

fn assert_active_is_valid(autocomplete: &Autocomplete<String>) {
    let flattened = autocomplete.flattened_items();
    match (autocomplete.active_item(), autocomplete.highlighted_index()) {
        (None, None) => {}
        (Some(active), Some(index)) => {
            assert_eq!(flattened.get(index), Some(&active));
        }
        pair => panic!("active entry and highlighted index disagree: {pair:?}"),
    }
}

#[test]
fn test_active_stays_valid_across_filter_changes() {
    let mut autocomplete = Autocomplete::new(fruits()).unwrap();

    let texts = ["", "a", "ap", "apr", "b", "blue", "x", "", "e", "err"];
    for (step, text) in texts.iter().enumerate() {
        autocomplete.set_input_value(*text);
        assert_active_is_valid(&autocomplete);

        autocomplete.handle_key(if step % 2 == 0 {
            NavigationKey::ArrowDown
        } else {
            NavigationKey::ArrowUp
        });
        assert_active_is_valid(&autocomplete);
    }

    autocomplete.set_items(vec!["Kiwi".into()]);
    assert_active_is_valid(&autocomplete);
    autocomplete.set_items(Vec::new());
    assert_active_is_valid(&autocomplete);
    assert_eq!(autocomplete.active_item(), None);
}

#[test]
fn test_reselecting_in_single_mode() {
    // Unfiltered, so the selected text does not narrow the list to one entry.
    let config = fruits().with_match_mode(MatchMode::All, CaseSensitivity::CaseInsensitive);
    let mut autocomplete = Autocomplete::new(config).unwrap();
    let count = Arc::new(Mutex::new(0));
    let count_clone = count.clone();
    autocomplete.item_selected.connect(move |_| *count_clone.lock() += 1);

    autocomplete.select("Banana".to_string());
    autocomplete.handle_key(NavigationKey::ArrowDown);
    assert!(autocomplete.is_open());
    assert!(autocomplete.active_item().is_some());

    autocomplete.select("Banana".to_string());
    assert_eq!(autocomplete.selected(), Some("Banana".to_string()));
    assert!(!autocomplete.is_open());
    assert_eq!(autocomplete.active_item(), None);
    assert_eq!(*count.lock(), 2);
}

#[test]
fn test_toggle_is_an_involution() {
    let selections: [&[&str]; 3] = [&[], &["Apple"], &["Cherry", "Apple", "Banana"]];
    for selection in selections {
        for x in ["Apple", "Banana", "Durian"] {
            if selection.contains(&x) {
                continue;
            }
            let once = toggle_membership(selection, &x);
            assert_eq!(once.last(), Some(&x));
            assert_eq!(toggle_membership(&once, &x), selection);
        }
    }

    // A member toggled off and on again moves to the end.
    let selection = ["Cherry", "Apple", "Banana"];
    let removed = toggle_membership(&selection, &"Apple");
    assert_eq!(removed, ["Cherry", "Banana"]);
    assert_eq!(toggle_membership(&removed, &"Apple"), ["Cherry", "Banana", "Apple"]);

    let mut autocomplete = Autocomplete::new(fruits().with_mode(Mode::Multiple)).unwrap();
    autocomplete.select("Cherry".to_string());
    let before = autocomplete.selected_items();
    autocomplete.select("Apple".to_string());
    autocomplete.select("Apple".to_string());
    assert_eq!(autocomplete.selected_items(), before);
}

#[test]
fn test_custom_value_exactness() {
    let mut autocomplete = Autocomplete::new(
        AutocompleteConfig::for_strings(["Red", "Blue"]).with_allows_custom_value(true),
    )
    .unwrap();
    let has_custom = |autocomplete: &Autocomplete<String>| {
        autocomplete
            .flattened_items()
            .iter()
            .filter_map(Entry::as_item)
            .any(|item| autocomplete.is_custom_value(item))
    };

    autocomplete.set_input_value("");
    assert!(!has_custom(&autocomplete));
    autocomplete.set_input_value("   ");
    assert!(!has_custom(&autocomplete));
    autocomplete.set_input_value("Red");
    assert!(!has_custom(&autocomplete));
    autocomplete.set_input_value("red");
    assert!(has_custom(&autocomplete));

    autocomplete.set_input_value("Teal");
    assert!(has_custom(&autocomplete));
    assert_eq!(autocomplete.flattened_items().len(), 3);

    autocomplete.set_items(vec!["Red".into(), "Blue".into(), "Teal".into()]);
    assert!(!has_custom(&autocomplete));
    assert_eq!(autocomplete.flattened_items().len(), 3);

    let mut disallowed = Autocomplete::new(AutocompleteConfig::for_strings(["Red"])).unwrap();
    disallowed.set_input_value("Teal");
    assert!(!has_custom(&disallowed));
}

#[test]
fn test_navigation_wraps_at_both_ends() {
    let mut autocomplete = Autocomplete::new(fruits()).unwrap();
    let last = autocomplete.flattened_items().len() - 1;

    autocomplete.handle_key(NavigationKey::ArrowDown);
    assert_eq!(autocomplete.highlighted_index(), Some(0));
    autocomplete.handle_key(NavigationKey::ArrowUp);
    assert_eq!(autocomplete.highlighted_index(), Some(last));
    autocomplete.handle_key(NavigationKey::ArrowDown);
    assert_eq!(autocomplete.highlighted_index(), Some(0));

    assert!(autocomplete.set_highlighted_index(Some(last)));
    autocomplete.handle_key(NavigationKey::ArrowDown);
    assert_eq!(autocomplete.highlighted_index(), Some(0));
}

#[test]
fn test_empty_collection_gate() {
    let empty = || AutocompleteConfig::for_strings(Vec::<String>::new());

    let mut gated = Autocomplete::new(empty()).unwrap();
    gated.handle_key(NavigationKey::ArrowDown);
    assert!(!gated.is_open());
    gated.focus();
    assert!(!gated.is_open());

    let mut allowed = Autocomplete::new(empty().with_allows_empty_collection(true)).unwrap();
    allowed.handle_key(NavigationKey::ArrowDown);
    assert!(allowed.is_open());
    assert_eq!(allowed.active_item(), None);

    let mut focused = Autocomplete::new(empty().with_allows_empty_collection(true)).unwrap();
    focused.focus();
    assert!(focused.is_open());
}

#[test]
fn test_attributes_are_order_independent() {
    let mut autocomplete = Autocomplete::new(fruits()).unwrap();
    autocomplete.set_input_value("an");
    autocomplete.handle_key(NavigationKey::ArrowDown);

    let first = (
        autocomplete.input_attributes(),
        autocomplete.option_attributes(0),
        autocomplete.root_attributes(),
    );
    let root = autocomplete.root_attributes();
    let option = autocomplete.option_attributes(0);
    let input = autocomplete.input_attributes();
    assert_eq!(first, (input, option, root));
}
