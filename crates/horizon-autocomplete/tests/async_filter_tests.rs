//! Tests for async filtering and hooks driven through the engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use horizon_autocomplete::prelude::*;
use parking_lot::Mutex;
use tokio::sync::oneshot;

const FRUITS: [&str; 5] = ["Apple", "Apricot", "Banana", "Blueberry", "Cherry"];

fn matching(text: &str) -> Vec<String> {
    let needle = text.to_lowercase();
    FRUITS
        .iter()
        .filter(|fruit| fruit.to_lowercase().contains(&needle))
        .map(|fruit| fruit.to_string())
        .collect()
}

fn names(autocomplete: &Autocomplete<String>) -> Vec<String> {
    autocomplete
        .flattened_items()
        .iter()
        .filter_map(|entry| entry.as_item().cloned())
        .collect()
}

#[tokio::test]
async fn test_slow_earlier_request_never_wins() {
    // The first request starts and blocks until released, after the second
    // one resolved.
    let (release_tx, release_rx) = oneshot::channel::<()>();
    let release_rx = Arc::new(Mutex::new(Some(release_rx)));

    let filter = filter_fn(move |request: AsyncRequest| {
        let gate = release_rx.lock().take();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok::<_, AsyncError>(matching(&request.text))
        }
    });
    let config = AutocompleteConfig::for_strings(FRUITS).with_filter(filter);
    let mut autocomplete = Autocomplete::new(config).unwrap();

    autocomplete.set_input_value("a");
    tokio::time::sleep(Duration::from_millis(5)).await;
    autocomplete.set_input_value("ap");
    assert_eq!(autocomplete.pending_requests(), 2);

    tokio::time::sleep(Duration::from_millis(10)).await;
    autocomplete.process_pending();
    assert_eq!(names(&autocomplete), vec!["Apple", "Apricot"]);

    let _ = release_tx.send(());
    autocomplete.settle().await;
    assert_eq!(names(&autocomplete), vec!["Apple", "Apricot"]);
    assert_eq!(autocomplete.pending_requests(), 0);
}

#[tokio::test]
async fn test_superseded_request_sees_cancellation() {
    let tokens = Arc::new(Mutex::new(Vec::new()));
    let tokens_clone = tokens.clone();
    let filter = filter_fn(move |request: AsyncRequest| {
        tokens_clone.lock().push(request.token.clone());
        async move {
            if request.text == "a" {
                request.token.cancelled().await;
                return Err(AsyncError::Cancelled);
            }
            Ok(matching(&request.text))
        }
    });
    let mut autocomplete =
        Autocomplete::new(AutocompleteConfig::for_strings(FRUITS).with_filter(filter)).unwrap();

    autocomplete.set_input_value("a");
    tokio::time::sleep(Duration::from_millis(5)).await;
    autocomplete.set_input_value("ch");
    autocomplete.settle().await;

    assert_eq!(names(&autocomplete), vec!["Cherry"]);
    let tokens = tokens.lock();
    assert!(tokens[0].is_cancelled());
}

#[tokio::test]
async fn test_failed_filter_keeps_previous_items() {
    let filter = filter_fn(|request: AsyncRequest| async move {
        if request.text == "boom" {
            Err(AsyncError::failed("backend unavailable"))
        } else {
            Ok(matching(&request.text))
        }
    });
    let mut autocomplete =
        Autocomplete::new(AutocompleteConfig::for_strings(FRUITS).with_filter(filter)).unwrap();

    autocomplete.set_input_value("b");
    autocomplete.settle().await;
    assert_eq!(names(&autocomplete), vec!["Banana", "Blueberry"]);
    autocomplete.handle_key(NavigationKey::ArrowDown);

    autocomplete.set_input_value("boom");
    autocomplete.settle().await;
    assert_eq!(names(&autocomplete), vec!["Banana", "Blueberry"]);
    assert!(autocomplete.is_open());
    assert!(!autocomplete.is_filtering());
}

#[tokio::test]
async fn test_debounce_calls_filter_once_per_burst() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();
    let filter = filter_fn(move |request: AsyncRequest| {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        async move { Ok(matching(&request.text)) }
    });
    let config = AutocompleteConfig::for_strings(FRUITS)
        .with_filter(filter)
        .with_debounce(Duration::from_millis(25));
    let mut autocomplete = Autocomplete::new(config).unwrap();

    for text in ["b", "bl", "blu"] {
        autocomplete.set_input_value(text);
    }
    autocomplete.settle().await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(names(&autocomplete), vec!["Blueberry"]);
    assert_eq!(autocomplete.active_item(), Some(Entry::Item("Blueberry".to_string())));
}

#[tokio::test]
async fn test_focus_reissues_filter_and_blur_runs_hook() {
    let texts = Arc::new(Mutex::new(Vec::new()));
    let texts_clone = texts.clone();
    let filter = filter_fn(move |request: AsyncRequest| {
        texts_clone.lock().push(request.text.clone());
        async move { Ok(matching(&request.text)) }
    });
    let blurs = Arc::new(AtomicUsize::new(0));
    let blurs_clone = blurs.clone();
    let on_blur = hook_fn(move |_request: AsyncRequest| {
        blurs_clone.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    });
    let config = AutocompleteConfig::for_strings(FRUITS)
        .with_filter(filter)
        .with_on_blur(on_blur);
    let mut autocomplete = Autocomplete::new(config).unwrap();

    autocomplete.focus();
    autocomplete.settle().await;
    assert!(autocomplete.is_open());
    assert_eq!(*texts.lock(), vec![String::new()]);

    autocomplete.focus();
    autocomplete.settle().await;
    assert_eq!(texts.lock().len(), 2);

    autocomplete.blur();
    autocomplete.settle().await;
    assert_eq!(blurs.load(Ordering::SeqCst), 1);
    assert!(!autocomplete.is_focused());
}

#[tokio::test]
async fn test_input_change_hook_is_independent() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let on_input_change = hook_fn(move |request: AsyncRequest| {
        let seen = seen_clone.clone();
        async move {
            seen.lock().push(request.text);
            Ok(())
        }
    });
    let filter = filter_fn(|request: AsyncRequest| async move { Ok(matching(&request.text)) });
    let config = AutocompleteConfig::for_strings(FRUITS)
        .with_filter(filter)
        .with_on_input_change(on_input_change);
    let mut autocomplete = Autocomplete::new(config).unwrap();

    autocomplete.set_input_value("ch");
    autocomplete.settle().await;

    assert_eq!(*seen.lock(), vec!["ch".to_string()]);
    assert_eq!(names(&autocomplete), vec!["Cherry"]);
}

#[test]
fn test_filter_outside_a_runtime_uses_the_global_one() {
    let filter = filter_fn(|request: AsyncRequest| async move { Ok(matching(&request.text)) });
    let mut autocomplete =
        Autocomplete::new(AutocompleteConfig::for_strings(FRUITS).with_filter(filter)).unwrap();

    autocomplete.set_input_value("cot");
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while autocomplete.pending_requests() > 0 && std::time::Instant::now() < deadline {
        autocomplete.process_pending();
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(names(&autocomplete), vec!["Apricot"]);
}
