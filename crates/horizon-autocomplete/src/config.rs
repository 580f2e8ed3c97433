//! Configuration of an autocomplete.
//!
//! [`AutocompleteConfig`] is built with `with_*` methods and consumed by
//! [`Autocomplete::new`](crate::Autocomplete::new). Its plain-data part,
//! [`AutocompleteSettings`], can be loaded from JSON/TOML with serde.
//!
//! # Example
//!
//! ```
//! use horizon_autocomplete::prelude::*;
//!
//! let config = AutocompleteConfig::for_strings(["Apple", "Banana", "Cherry"])
//!     .with_mode(Mode::Multiple)
//!     .with_label("Fruit")
//!     .with_allows_custom_value(true);
//!
//! let autocomplete = Autocomplete::new(config).unwrap();
//! assert_eq!(autocomplete.flattened_items().len(), 3);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::filtering::{FilterFn, HookFn};
use crate::grouping::GroupingLevel;
use crate::item::{ActionItem, Entry, Mode, OptionLink};
use crate::state::Controlled;
use crate::tabs::Tab;

/// Projection from an item to its display string.
pub type ItemToStringFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
/// Predicate marking items that cannot be selected.
pub type ItemDisabledFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
/// Builds an item from literal typed text.
pub type CustomItemFn<T> = Arc<dyn Fn(&str) -> T + Send + Sync>;
/// Projection from an item to the link it renders as, if any.
pub type OptionLinkFn<T> = Arc<dyn Fn(&T) -> Option<OptionLink> + Send + Sync>;

/// Controls how the built-in synchronous filter handles letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    /// Case-sensitive matching (e.g., "App" won't match "apple").
    CaseSensitive,
    /// Case-insensitive matching (e.g., "App" will match "apple").
    #[default]
    CaseInsensitive,
}

/// The built-in synchronous filter applied when no async filter is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Show every resident item regardless of the input text.
    #[default]
    All,
    /// Show items whose display string starts with the input text.
    StartsWith,
    /// Show items whose display string contains the input text.
    Contains,
}

impl MatchMode {
    /// Whether `candidate` matches `text` under this mode.
    ///
    /// Empty text matches everything.
    pub fn matches(self, candidate: &str, text: &str, case: CaseSensitivity) -> bool {
        if text.is_empty() {
            return true;
        }
        match (self, case) {
            (Self::All, _) => true,
            (Self::StartsWith, CaseSensitivity::CaseSensitive) => candidate.starts_with(text),
            (Self::Contains, CaseSensitivity::CaseSensitive) => candidate.contains(text),
            (Self::StartsWith, CaseSensitivity::CaseInsensitive) => {
                candidate.to_lowercase().starts_with(&text.to_lowercase())
            }
            (Self::Contains, CaseSensitivity::CaseInsensitive) => {
                candidate.to_lowercase().contains(&text.to_lowercase())
            }
        }
    }
}

/// Plain-data settings of an autocomplete.
///
/// All fields have defaults, so a settings file only needs what it changes:
///
/// ```
/// use horizon_autocomplete::{AutocompleteSettings, Mode};
///
/// let settings: AutocompleteSettings =
///     serde_json::from_str(r#"{ "mode": "multiple", "debounce_ms": 150 }"#).unwrap();
/// assert_eq!(settings.mode, Mode::Multiple);
/// assert!(!settings.allows_empty_collection);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteSettings {
    /// Single or multiple selection.
    pub mode: Mode,
    /// Delay before an async filter request is issued, in milliseconds.
    pub debounce_ms: u64,
    /// Offer the typed text as an entry when nothing matches it exactly.
    pub allows_custom_value: bool,
    /// Allow the list to open with nothing in it.
    pub allows_empty_collection: bool,
    /// Initial open state of an uncontrolled open flag.
    pub default_open: bool,
    /// Accessible label of the widget.
    pub label: String,
    /// Whether the label is only exposed to assistive technology.
    pub label_visually_hidden: bool,
    /// Key of the tab active at start; the first tab when unset.
    pub default_tab_key: Option<String>,
    /// Prefix of generated element ids.
    pub id_prefix: String,
    /// Synchronous filter used when no async filter is configured.
    pub match_mode: MatchMode,
    /// Case handling of the synchronous filter.
    pub case_sensitivity: CaseSensitivity,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            mode: Mode::Single,
            debounce_ms: 0,
            allows_custom_value: false,
            allows_empty_collection: false,
            default_open: false,
            label: String::new(),
            label_visually_hidden: false,
            default_tab_key: None,
            id_prefix: "autocomplete".to_string(),
            match_mode: MatchMode::All,
            case_sensitivity: CaseSensitivity::CaseInsensitive,
        }
    }
}

impl AutocompleteSettings {
    /// The debounce delay as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Full configuration of an autocomplete over items of type `T`.
pub struct AutocompleteConfig<T> {
    pub(crate) settings: AutocompleteSettings,
    pub(crate) items: Vec<T>,
    pub(crate) item_to_string: ItemToStringFn<T>,
    pub(crate) is_item_disabled: Option<ItemDisabledFn<T>>,
    pub(crate) custom_item: Option<CustomItemFn<T>>,
    pub(crate) option_link: Option<OptionLinkFn<T>>,
    pub(crate) grouping: Vec<GroupingLevel<T>>,
    pub(crate) tabs: Vec<Tab<T>>,
    pub(crate) actions: Vec<ActionItem>,
    pub(crate) filter: Option<FilterFn<T>>,
    pub(crate) on_blur: Option<HookFn>,
    pub(crate) on_input_change: Option<HookFn>,
    pub(crate) default_value: Option<T>,
    pub(crate) default_values: Vec<T>,
    pub(crate) default_input_value: String,
    pub(crate) input_value: Option<Controlled<String>>,
    pub(crate) selected: Option<Controlled<Option<T>>>,
    pub(crate) selected_items: Option<Controlled<Vec<T>>>,
    pub(crate) open: Option<Controlled<bool>>,
    pub(crate) active: Option<Controlled<Option<Entry<T>>>>,
    pub(crate) highlighted_index: Option<Controlled<Option<usize>>>,
    pub(crate) runtime: Option<tokio::runtime::Handle>,
}

impl<T> AutocompleteConfig<T> {
    /// Create a configuration over `items` displayed with `item_to_string`.
    pub fn new(
        items: impl IntoIterator<Item = T>,
        item_to_string: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            settings: AutocompleteSettings::default(),
            items: items.into_iter().collect(),
            item_to_string: Arc::new(item_to_string),
            is_item_disabled: None,
            custom_item: None,
            option_link: None,
            grouping: Vec::new(),
            tabs: Vec::new(),
            actions: Vec::new(),
            filter: None,
            on_blur: None,
            on_input_change: None,
            default_value: None,
            default_values: Vec::new(),
            default_input_value: String::new(),
            input_value: None,
            selected: None,
            selected_items: None,
            open: None,
            active: None,
            highlighted_index: None,
            runtime: None,
        }
    }

    /// Replace all plain-data settings.
    pub fn with_settings(mut self, settings: AutocompleteSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The plain-data settings.
    pub fn settings(&self) -> &AutocompleteSettings {
        &self.settings
    }

    /// Set the selection mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.settings.mode = mode;
        self
    }

    /// Set the async filter debounce delay.
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.settings.debounce_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Allow the typed text to be offered as an entry.
    ///
    /// Requires a [custom item factory](Self::with_custom_item).
    pub fn with_allows_custom_value(mut self, allows: bool) -> Self {
        self.settings.allows_custom_value = allows;
        self
    }

    /// Allow the list to open with nothing in it.
    pub fn with_allows_empty_collection(mut self, allows: bool) -> Self {
        self.settings.allows_empty_collection = allows;
        self
    }

    /// Start with the list open.
    pub fn with_default_open(mut self, open: bool) -> Self {
        self.settings.default_open = open;
        self
    }

    /// Set the accessible label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.settings.label = label.into();
        self
    }

    /// Expose the label only to assistive technology.
    pub fn with_label_visually_hidden(mut self, hidden: bool) -> Self {
        self.settings.label_visually_hidden = hidden;
        self
    }

    /// Set the prefix of generated element ids.
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.settings.id_prefix = prefix.into();
        self
    }

    /// Set the synchronous filter used when no async filter is configured.
    pub fn with_match_mode(mut self, mode: MatchMode, case: CaseSensitivity) -> Self {
        self.settings.match_mode = mode;
        self.settings.case_sensitivity = case;
        self
    }

    /// Mark items that cannot be selected.
    pub fn with_item_disabled(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.is_item_disabled = Some(Arc::new(predicate));
        self
    }

    /// Build items from typed text for custom values.
    pub fn with_custom_item(mut self, factory: impl Fn(&str) -> T + Send + Sync + 'static) -> Self {
        self.custom_item = Some(Arc::new(factory));
        self
    }

    /// Render options as links.
    pub fn with_option_link(
        mut self,
        projection: impl Fn(&T) -> Option<OptionLink> + Send + Sync + 'static,
    ) -> Self {
        self.option_link = Some(Arc::new(projection));
        self
    }

    /// Add a grouping level. Levels nest in the order they are added.
    pub fn with_grouping(mut self, level: GroupingLevel<T>) -> Self {
        self.grouping.push(level);
        self
    }

    /// Add a tab.
    pub fn with_tab(mut self, tab: Tab<T>) -> Self {
        self.tabs.push(tab);
        self
    }

    /// Set the tab that is active at start.
    pub fn with_default_tab_key(mut self, key: impl Into<String>) -> Self {
        self.settings.default_tab_key = Some(key.into());
        self
    }

    /// Add an action row.
    pub fn with_action(mut self, action: ActionItem) -> Self {
        self.actions.push(action);
        self
    }

    /// Set the async filter. Its results replace the resident items.
    pub fn with_filter(mut self, filter: FilterFn<T>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the async hook run when the input loses focus.
    pub fn with_on_blur(mut self, hook: HookFn) -> Self {
        self.on_blur = Some(hook);
        self
    }

    /// Set the async hook run on every input change.
    pub fn with_on_input_change(mut self, hook: HookFn) -> Self {
        self.on_input_change = Some(hook);
        self
    }

    /// Select `item` at start (single mode). Also sets the input text.
    pub fn with_default_value(mut self, item: T) -> Self {
        self.default_value = Some(item);
        self
    }

    /// Select `items` at start (multiple mode).
    pub fn with_default_values(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.default_values = items.into_iter().collect();
        self
    }

    /// Initial text of an uncontrolled input.
    pub fn with_default_input_value(mut self, text: impl Into<String>) -> Self {
        self.default_input_value = text.into();
        self
    }

    /// Let the caller own the input text.
    pub fn with_input_value(mut self, controlled: Controlled<String>) -> Self {
        self.input_value = Some(controlled);
        self
    }

    /// Let the caller own the single selection.
    pub fn with_selected(mut self, controlled: Controlled<Option<T>>) -> Self {
        self.selected = Some(controlled);
        self
    }

    /// Let the caller own the multiple selection.
    pub fn with_selected_items(mut self, controlled: Controlled<Vec<T>>) -> Self {
        self.selected_items = Some(controlled);
        self
    }

    /// Let the caller own the open flag.
    pub fn with_open(mut self, controlled: Controlled<bool>) -> Self {
        self.open = Some(controlled);
        self
    }

    /// Let the caller own the active entry.
    pub fn with_active(mut self, controlled: Controlled<Option<Entry<T>>>) -> Self {
        self.active = Some(controlled);
        self
    }

    /// Let the caller own the highlighted index.
    pub fn with_highlighted_index(mut self, controlled: Controlled<Option<usize>>) -> Self {
        self.highlighted_index = Some(controlled);
        self
    }

    /// Spawn async work on `handle` instead of the ambient or global runtime.
    pub fn with_runtime(mut self, handle: tokio::runtime::Handle) -> Self {
        self.runtime = Some(handle);
        self
    }
}

impl AutocompleteConfig<String> {
    /// Configuration over plain strings, with custom values built from the typed text.
    pub fn for_strings<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        Self::new(items.into_iter().map(Into::into), String::clone)
            .with_custom_item(str::to_string)
    }
}

impl<T> fmt::Debug for AutocompleteConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutocompleteConfig")
            .field("settings", &self.settings)
            .field("items", &self.items.len())
            .field("grouping", &self.grouping)
            .field("tabs", &self.tabs)
            .field("actions", &self.actions)
            .field("has_filter", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}
