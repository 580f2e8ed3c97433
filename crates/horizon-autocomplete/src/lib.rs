//! Horizon Autocomplete - a headless combobox/autocomplete state engine.
//!
//! Given a candidate set of items, free-text input and navigation events,
//! [`Autocomplete`] derives what is shown, what is active, what is selected
//! and the attribute bundles that describe it to assistive technology. It
//! draws nothing; renderers query it and feed it events.
//!
//! Features:
//!
//! - Single and multiple selection
//! - Synchronous match filtering, or caller-supplied async filtering with
//!   debounce and latest-request-wins cancellation
//! - Tabs that pre-filter the item set
//! - Nested grouping
//! - Action rows and a custom-value entry for the typed text
//! - Controlled and uncontrolled state, slice by slice
//!
//! # Example
//!
//! ```
//! use horizon_autocomplete::prelude::*;
//!
//! let config = AutocompleteConfig::for_strings(["Apple", "Apricot", "Banana"])
//!     .with_match_mode(MatchMode::StartsWith, CaseSensitivity::CaseInsensitive);
//! let mut autocomplete = Autocomplete::new(config).unwrap();
//!
//! autocomplete.set_input_value("ap");
//! assert_eq!(autocomplete.flattened_items().len(), 2);
//!
//! autocomplete.handle_key(NavigationKey::ArrowDown);
//! assert_eq!(autocomplete.input_attributes().active_descendant.map(|id| id.to_string()),
//!            Some("option-0".to_string()));
//! ```

pub mod attributes;
pub mod config;
pub mod engine;
mod error;
pub mod filtering;
pub mod grouping;
pub mod item;
pub mod navigation;
pub mod pipeline;
pub mod prelude;
pub mod role;
pub mod selection;
pub mod state;
pub mod tabs;

pub use attributes::OptionId;
pub use config::{AutocompleteConfig, AutocompleteSettings, CaseSensitivity, MatchMode};
pub use engine::{Autocomplete, AutocompleteItem};
pub use error::{AutocompleteError, Result};
pub use filtering::{filter_fn, hook_fn, AsyncRequest, FilterFn, HookFn};
pub use grouping::{Group, GroupingLevel};
pub use item::{ActionId, ActionItem, Entry, Mode, OptionLink, Placement};
pub use navigation::{KeyOutcome, NavigationKey};
pub use pipeline::RenderedItems;
pub use role::AccessibleRole;
pub use state::Controlled;
pub use tabs::{Tab, TabState};

pub use horizon_autocomplete_core::AsyncError;

static_assertions::assert_impl_all!(Autocomplete<String>: Send);
static_assertions::assert_impl_all!(AutocompleteConfig<String>: Send);
