//! Prelude module for Horizon Autocomplete.
//!
//! ```
//! use horizon_autocomplete::prelude::*;
//! ```
//!
//! This provides access to:
//! - The engine (`Autocomplete`) and its configuration
//! - Entries, actions and selection modes
//! - Keys and attribute bundles
//! - Async filter and hook helpers

// ============================================================================
// Engine and Configuration
// ============================================================================

pub use crate::config::{AutocompleteConfig, AutocompleteSettings, CaseSensitivity, MatchMode};
pub use crate::engine::{Autocomplete, AutocompleteItem};
pub use crate::error::{AutocompleteError, Result};
pub use crate::state::Controlled;

// ============================================================================
// Items
// ============================================================================

pub use crate::grouping::{Group, GroupingLevel};
pub use crate::item::{ActionItem, Entry, Mode, OptionLink, Placement};
pub use crate::pipeline::RenderedItems;
pub use crate::tabs::{Tab, TabState};

// ============================================================================
// Interaction and Accessibility
// ============================================================================

pub use crate::attributes::OptionId;
pub use crate::navigation::{KeyOutcome, NavigationKey};
pub use crate::role::AccessibleRole;

// ============================================================================
// Async Filtering
// ============================================================================

pub use crate::filtering::{filter_fn, hook_fn, AsyncRequest};
pub use horizon_autocomplete_core::AsyncError;

// Signals are public fields on the engine.
pub use horizon_autocomplete_core::Signal;
