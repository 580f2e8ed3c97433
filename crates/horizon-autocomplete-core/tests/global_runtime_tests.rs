//! The configured global runtime, in its own process so nothing else
//! initializes it first.

use horizon_autocomplete_core::{AsyncRuntime, AsyncRuntimeConfig, AsyncRuntimeError};

#[test]
fn test_init_global_configures_the_fallback_runtime() {
    AsyncRuntime::init_global(
        AsyncRuntimeConfig::default()
            .with_worker_threads(1)
            .with_thread_name("autocomplete-worker"),
    )
    .unwrap();

    let again = AsyncRuntime::init_global(AsyncRuntimeConfig::default());
    assert!(matches!(again, Err(AsyncRuntimeError::AlreadyInitialized)));

    // Outside any Tokio context, tasks land on the configured runtime.
    let handle = AsyncRuntime::current_or_global();
    let task = handle.spawn(async { std::thread::current().name().map(str::to_string) });
    let name = handle.block_on(task).unwrap();
    assert_eq!(name.as_deref(), Some("autocomplete-worker"));
}
