//! Integration tests for signals and properties used together.

use std::sync::Arc;

use horizon_autocomplete_core::{Property, Signal};
use parking_lot::Mutex;

struct Selection {
    value: Property<Option<String>>,
    changed: Signal<Option<String>>,
}

impl Selection {
    fn new() -> Self {
        Self {
            value: Property::new(None),
            changed: Signal::new(),
        }
    }

    fn select(&self, value: Option<&str>) {
        let value = value.map(str::to_string);
        if self.value.set(value.clone()) {
            self.changed.emit(value);
        }
    }
}

#[test]
fn test_change_notification_only_on_change() {
    let selection = Selection::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    selection
        .changed
        .connect(move |value| seen_clone.lock().push(value.clone()));

    selection.select(Some("Apple"));
    selection.select(Some("Apple"));
    selection.select(None);

    assert_eq!(*seen.lock(), vec![Some("Apple".to_string()), None]);
}

#[test]
fn test_silent_write_skips_notification() {
    let selection = Selection::new();
    let count = Arc::new(Mutex::new(0));
    let count_clone = count.clone();
    selection.changed.connect(move |_| *count_clone.lock() += 1);

    selection.value.set_silent(Some("Banana".to_string()));
    selection.select(Some("Banana"));

    assert_eq!(*count.lock(), 0);
    assert_eq!(selection.value.get(), Some("Banana".to_string()));
    assert!(selection.value.with(|value| value.as_deref() == Some("Banana")));
}

#[test]
fn test_slot_may_disconnect_itself() {
    let signal = Arc::new(Signal::<u32>::new());
    let calls = Arc::new(Mutex::new(0));

    let id = Arc::new(Mutex::new(None));
    let signal_clone = signal.clone();
    let calls_clone = calls.clone();
    let id_clone = id.clone();
    *id.lock() = Some(signal.connect(move |_| {
        *calls_clone.lock() += 1;
        if let Some(id) = id_clone.lock().take() {
            signal_clone.disconnect(id);
        }
    }));

    signal.emit(1);
    signal.emit(2);
    assert_eq!(*calls.lock(), 1);
    assert_eq!(signal.connection_count(), 0);
}
