//! Core primitives for Horizon Autocomplete.
//!
//! This crate provides the building blocks the autocomplete engine is made of:
//!
//! - **Property System**: Change-detecting state cells backing uncontrolled state
//! - **Signal/Slot System**: Type-safe callbacks for selection, clearing and input changes
//! - **Async Runtime**: Tokio integration, cooperative cancellation tokens and
//!   the update channel async tasks report back on
//! - **Logging**: Target names for filtering the engine's `tracing` output
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_autocomplete_core::Signal;
//!
//! // Create a signal that notifies when an item is selected
//! let item_selected = Signal::<String>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = item_selected.connect(|item| {
//!     println!("Selected: {}", item);
//! });
//!
//! // Emit the signal
//! item_selected.emit("Apple".to_string());
//!
//! // Disconnect when done
//! item_selected.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use horizon_autocomplete_core::{Property, Signal};
//!
//! // Input text with change notification
//! struct SearchField {
//!     text: Property<String>,
//!     text_changed: Signal<String>,
//! }
//!
//! impl SearchField {
//!     fn new() -> Self {
//!         Self {
//!             text: Property::new(String::new()),
//!             text_changed: Signal::new(),
//!         }
//!     }
//!
//!     fn type_text(&self, text: &str) {
//!         if self.text.set(text.to_string()) {
//!             self.text_changed.emit(text.to_string());
//!         }
//!     }
//! }
//! ```

pub mod async_runtime;
mod error;
pub mod logging;
pub mod property;
pub mod signal;

pub use async_runtime::{
    update_channel, AsyncCancellationToken, AsyncRuntime, AsyncRuntimeConfig, UpdateReceiver,
    UpdateSender,
};
pub use error::{AsyncError, AsyncRuntimeError, Result};
pub use property::Property;
pub use signal::{ConnectionId, Signal};

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);
static_assertions::assert_impl_all!(Property<String>: Send, Sync);
static_assertions::assert_impl_all!(AsyncCancellationToken: Send, Sync, Clone);
