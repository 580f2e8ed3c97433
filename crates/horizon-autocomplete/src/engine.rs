//! The autocomplete engine.
//!
//! [`Autocomplete`] owns every piece of interaction state of one combobox and
//! is the only thing that mutates it. Each public operation is one complete
//! transition: it requests state changes, recomputes the item pipeline and
//! re-validates the active entry before returning, so queries made afterwards
//! always see one consistent snapshot.
//!
//! Transitions are split over several modules by concern:
//! [`navigation`](crate::navigation) (keys, focus, open state),
//! [`selection`](crate::selection) (select, clear) and
//! [`attributes`](crate::attributes) (attribute bundles).
//!
//! # Example
//!
//! ```
//! use horizon_autocomplete::prelude::*;
//!
//! let mut autocomplete =
//!     Autocomplete::new(AutocompleteConfig::for_strings(["Apple", "Banana", "Cherry"])).unwrap();
//!
//! autocomplete.handle_key(NavigationKey::ArrowDown);
//! assert!(autocomplete.is_open());
//! assert_eq!(autocomplete.active_item(), Some(Entry::Item("Apple".to_string())));
//!
//! autocomplete.handle_key(NavigationKey::Enter);
//! assert_eq!(autocomplete.selected(), Some("Apple".to_string()));
//! assert_eq!(autocomplete.input_value(), "Apple");
//! ```

use std::fmt;

use horizon_autocomplete_core::logging::targets;
use horizon_autocomplete_core::Signal;

use crate::config::{
    AutocompleteConfig, AutocompleteSettings, CustomItemFn, ItemDisabledFn, ItemToStringFn,
    OptionLinkFn,
};
use crate::error::{AutocompleteError, Result};
use crate::filtering::{AsyncChannel, AsyncController, FilterFn, HookFn, Outcome};
use crate::grouping::{Group, GroupingLevel};
use crate::item::{ActionItem, Entry, Mode};
use crate::pipeline::{self, ItemView, PipelineInput, RenderedItems};
use crate::state::StateSlice;
use crate::tabs::{initial_tab, Tab, TabState};

/// Bounds every item type must satisfy.
pub trait AutocompleteItem: Clone + PartialEq + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Send + Sync + 'static> AutocompleteItem for T {}

/// A headless combobox/autocomplete state engine.
pub struct Autocomplete<T: AutocompleteItem> {
    pub(crate) settings: AutocompleteSettings,
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

    /// Items last supplied by the caller, for change detection.
    supplied_items: Vec<T>,
    /// Items the pipeline runs over: supplied items or the latest async result.
    pub(crate) resident: Vec<T>,

    pub(crate) input_value: StateSlice<String>,
    pub(crate) selected: StateSlice<Option<T>>,
    pub(crate) selected_items: StateSlice<Vec<T>>,
    pub(crate) open: StateSlice<bool>,
    pub(crate) active: StateSlice<Option<Entry<T>>>,
    pub(crate) highlighted: StateSlice<Option<usize>>,
    pub(crate) active_tab: Option<usize>,
    pub(crate) focused: bool,

    pub(crate) view: ItemView<T>,
    pub(crate) controller: AsyncController<T>,
    /// Text of the most recently issued filter request.
    last_filter_text: Option<String>,

    /// Emitted with the item on every selection, including a toggle-off in
    /// multiple mode.
    pub item_selected: Signal<T>,
    /// Emitted when the input is cleared with [`clear`](Self::clear).
    pub cleared: Signal<()>,
    /// Emitted with the new text whenever the user changes the input.
    pub input_value_changed: Signal<String>,
}

impl<T: AutocompleteItem> Autocomplete<T> {
    /// Create an engine from a configuration.
    ///
    /// Fails if the configuration cannot be honoured: an unknown default tab
    /// key, or custom values without a custom item factory.
    pub fn new(config: AutocompleteConfig<T>) -> Result<Self> {
        let AutocompleteConfig {
            settings,
            items,
            item_to_string,
            is_item_disabled,
            custom_item,
            option_link,
            grouping,
            tabs,
            actions,
            filter,
            on_blur,
            on_input_change,
            default_value,
            default_values,
            default_input_value,
            input_value,
            selected,
            selected_items,
            open,
            active,
            highlighted_index,
            runtime,
        } = config;

        if settings.allows_custom_value && custom_item.is_none() {
            return Err(AutocompleteError::MissingCustomItemFactory);
        }
        let active_tab = initial_tab(&tabs, settings.default_tab_key.as_deref())?;
        let controller = AsyncController::new(runtime, settings.debounce());

        let mut autocomplete = Self {
            input_value: StateSlice::resolve("input_value", default_input_value, input_value),
            selected: StateSlice::resolve("selected", None, selected),
            selected_items: StateSlice::resolve("selected_items", default_values, selected_items),
            open: StateSlice::resolve("open", settings.default_open, open),
            active: StateSlice::resolve("active", None, active),
            highlighted: StateSlice::resolve("highlighted_index", None, highlighted_index),
            settings,
            item_to_string,
            is_item_disabled,
            custom_item,
            option_link,
            grouping,
            tabs,
            actions,
            filter,
            on_blur,
            on_input_change,
            supplied_items: items.clone(),
            resident: items,
            active_tab,
            focused: false,
            view: ItemView::default(),
            controller,
            last_filter_text: None,
            item_selected: Signal::new(),
            cleared: Signal::new(),
            input_value_changed: Signal::new(),
        };

        // Applied once; a later clear does not bring it back.
        if autocomplete.settings.mode == Mode::Single
            && let Some(item) = default_value
        {
            let text = (autocomplete.item_to_string)(&item);
            autocomplete.selected.request(Some(item));
            autocomplete.input_value.request(text);
        }

        autocomplete.recompute();
        tracing::debug!(
            target: targets::ENGINE,
            mode = autocomplete.settings.mode.as_str(),
            items = autocomplete.resident.len(),
            tabs = autocomplete.tabs.len(),
            grouping_levels = autocomplete.grouping.len(),
            has_filter = autocomplete.filter.is_some(),
            "autocomplete created"
        );
        Ok(autocomplete)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The plain-data settings.
    pub fn settings(&self) -> &AutocompleteSettings {
        &self.settings
    }

    /// The selection mode.
    pub fn mode(&self) -> Mode {
        self.settings.mode
    }

    /// The current input text.
    pub fn input_value(&self) -> String {
        self.input_value.get()
    }

    /// The selected item in single mode; always `None` in multiple mode.
    pub fn selected(&self) -> Option<T> {
        match self.settings.mode {
            Mode::Single => self.selected.get(),
            Mode::Multiple => None,
        }
    }

    /// The selected items in multiple mode, in selection order; always empty
    /// in single mode.
    pub fn selected_items(&self) -> Vec<T> {
        match self.settings.mode {
            Mode::Single => Vec::new(),
            Mode::Multiple => self.selected_items.get(),
        }
    }

    /// Whether anything is selected.
    pub fn has_selection(&self) -> bool {
        match self.settings.mode {
            Mode::Single => self.selected.with(Option::is_some),
            Mode::Multiple => self.selected_items.with(|items| !items.is_empty()),
        }
    }

    /// Whether `item` is selected.
    pub fn is_selected(&self, item: &T) -> bool {
        match self.settings.mode {
            Mode::Single => self.selected.with(|selected| selected.as_ref() == Some(item)),
            Mode::Multiple => self.selected_items.with(|items| items.contains(item)),
        }
    }

    /// Whether the list is open.
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Whether the input has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The active entry, if it is part of the current navigable sequence.
    pub fn active_item(&self) -> Option<Entry<T>> {
        self.active_pair().map(|(entry, _)| entry)
    }

    /// The highlighted index, always the position of [`active_item`](Self::active_item).
    pub fn highlighted_index(&self) -> Option<usize> {
        self.active_pair().map(|(_, index)| index)
    }

    /// What to render: a flat list or a group tree.
    pub fn items(&self) -> RenderedItems<'_, T> {
        self.view.rendered()
    }

    /// The navigable sequence.
    pub fn flattened_items(&self) -> &[Entry<T>] {
        self.view.flattened()
    }

    /// The group tree, when grouping is configured.
    pub fn groups(&self) -> Option<&[Group<T>]> {
        self.view.groups()
    }

    /// The items the pipeline runs over.
    pub fn resident_items(&self) -> &[T] {
        &self.resident
    }

    /// The display string of `item`.
    pub fn item_to_string(&self, item: &T) -> String {
        (self.item_to_string)(item)
    }

    /// Whether the caller marked `item` as disabled.
    pub fn is_item_disabled(&self, item: &T) -> bool {
        self.is_item_disabled
            .as_ref()
            .is_some_and(|disabled| disabled(item))
    }

    /// Whether `item` is the synthetic entry for the typed text.
    ///
    /// Derived from the current state on every call: custom values must be
    /// allowed, the text must not be blank, `item` must display as the text
    /// and no working item may display as the text.
    pub fn is_custom_value(&self, item: &T) -> bool {
        if !self.settings.allows_custom_value {
            return false;
        }
        self.input_value.with(|text| {
            (self.item_to_string)(item) == *text
                && pipeline::offers_custom_value(self.view.working(), text, &self.item_to_string)
        })
    }

    /// The configured tabs.
    pub fn tabs(&self) -> &[Tab<T>] {
        &self.tabs
    }

    /// Index of the active tab; `None` when no tabs are configured.
    pub fn active_tab_index(&self) -> Option<usize> {
        self.active_tab
    }

    /// State of the tab at `index`.
    pub fn tab_state(&self, index: usize) -> Option<TabState> {
        let tab = self.tabs.get(index)?;
        Some(TabState {
            selected: self.active_tab == Some(index),
            disabled: false,
            item_count: tab.count_matches(&self.resident),
        })
    }

    /// Number of async requests whose completion has not been processed.
    pub fn pending_requests(&self) -> usize {
        self.controller.pending()
    }

    /// Whether an async filter request is in flight.
    pub fn is_filtering(&self) -> bool {
        self.controller.is_in_flight(AsyncChannel::Filter)
    }

    pub(crate) fn can_open(&self) -> bool {
        self.settings.allows_empty_collection || !self.view.is_empty()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// The user changed the input text.
    ///
    /// Notifies [`input_value_changed`](Self::input_value_changed), runs the
    /// input-change hook and issues a filter request for the new text.
    #[tracing::instrument(skip(self, text), target = "horizon_autocomplete::engine", level = "trace")]
    pub fn set_input_value(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.request_input(text.clone());
        self.input_value_changed.emit(text.clone());
        if let Some(hook) = &self.on_input_change {
            self.controller.issue_hook(AsyncChannel::InputChange, hook, &text);
        }
        self.recompute();
    }

    /// Replace the caller-supplied items.
    ///
    /// Ignored when `items` equals the previously supplied set element-wise,
    /// so callers can pass their collection on every render.
    pub fn set_items(&mut self, items: Vec<T>) {
        if items == self.supplied_items {
            return;
        }
        tracing::debug!(target: targets::ENGINE, count = items.len(), "items replaced");
        self.supplied_items = items.clone();
        self.resident = items;
        self.recompute();
    }

    /// Request the open state directly.
    pub fn set_open(&mut self, open: bool) {
        self.open.request(open);
        self.recompute();
    }

    /// Make `entry` active.
    ///
    /// Returns `false` and changes nothing if `entry` is not part of the
    /// navigable sequence.
    pub fn set_active_item(&mut self, entry: Option<Entry<T>>) -> bool {
        let index = match &entry {
            Some(entry) => match self.view.position(entry) {
                Some(index) => Some(index),
                None => {
                    tracing::debug!(target: targets::NAVIGATION, "ignoring activation of an entry outside the list");
                    return false;
                }
            },
            None => None,
        };
        self.set_active_pair(entry, index);
        self.recompute();
        true
    }

    /// Make the entry at `index` active.
    ///
    /// Returns `false` and changes nothing if `index` is out of range.
    pub fn set_highlighted_index(&mut self, index: Option<usize>) -> bool {
        let entry = match index {
            Some(index) => match self.view.get(index) {
                Some(entry) => Some(entry.clone()),
                None => return false,
            },
            None => None,
        };
        self.set_active_pair(entry, index);
        self.recompute();
        true
    }

    // =========================================================================
    // Controlled state
    // =========================================================================

    /// Feed in the caller's input text.
    ///
    /// Issues a filter request if the text differs from the last one filtered.
    pub fn sync_input_value(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.input_value.sync(text.clone());
        self.issue_filter_if_changed(&text);
        self.recompute();
    }

    /// Feed in the caller's single selection.
    pub fn sync_selected(&mut self, selected: Option<T>) {
        self.selected.sync(selected);
        self.recompute();
    }

    /// Feed in the caller's multiple selection.
    pub fn sync_selected_items(&mut self, selected: Vec<T>) {
        self.selected_items.sync(selected);
        self.recompute();
    }

    /// Feed in the caller's open flag.
    pub fn sync_open(&mut self, open: bool) {
        self.open.sync(open);
        self.recompute();
    }

    /// Feed in the caller's active entry.
    ///
    /// An engine-owned highlighted index follows it.
    pub fn sync_active(&mut self, active: Option<Entry<T>>) {
        if !self.highlighted.is_controlled() {
            let index = active.as_ref().and_then(|entry| self.view.position(entry));
            self.highlighted.sync(index);
        }
        self.active.sync(active);
        self.recompute();
    }

    /// Feed in the caller's highlighted index.
    ///
    /// An engine-owned active entry follows it.
    pub fn sync_highlighted_index(&mut self, index: Option<usize>) {
        if !self.active.is_controlled() {
            let entry = index.and_then(|index| self.view.get(index).cloned());
            self.active.sync(entry);
        }
        self.highlighted.sync(index);
        self.recompute();
    }

    // =========================================================================
    // Async results
    // =========================================================================

    /// Apply every async completion that has arrived, without waiting.
    ///
    /// Returns the number of filter results applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.controller.try_next() {
            if self.apply_outcome(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for every in-flight async request and apply its completion.
    pub async fn settle(&mut self) {
        while let Some(outcome) = self.controller.next().await {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome<T>) -> bool {
        match outcome {
            Outcome::Items(items) => {
                tracing::debug!(target: targets::FILTER, count = items.len(), "applying filter result");
                self.resident = items;
                self.recompute();
                true
            }
            Outcome::HookFinished(channel) => {
                tracing::trace!(target: targets::HOOK, ?channel, "hook finished");
                false
            }
            Outcome::Discarded | Outcome::Failed => false,
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Request new input text and filter for it.
    pub(crate) fn request_input(&mut self, text: String) {
        self.issue_filter_if_changed(&text);
        self.input_value.request(text);
    }

    pub(crate) fn issue_filter(&mut self, text: &str) {
        if let Some(filter) = &self.filter {
            self.controller.issue_filter(filter, text);
            self.last_filter_text = Some(text.to_string());
        }
    }

    fn issue_filter_if_changed(&mut self, text: &str) {
        if self.last_filter_text.as_deref() != Some(text) {
            self.issue_filter(text);
        }
    }

    /// Request the active entry and highlighted index together.
    pub(crate) fn set_active_pair(&mut self, entry: Option<Entry<T>>, index: Option<usize>) {
        self.active.request(entry);
        self.highlighted.request(index);
    }

    /// Re-run the pipeline and re-validate the active entry.
    pub(crate) fn recompute(&mut self) {
        let custom_item = if self.settings.allows_custom_value {
            self.custom_item.as_ref()
        } else {
            None
        };
        let sync_filter = self
            .filter
            .is_none()
            .then_some((self.settings.match_mode, self.settings.case_sensitivity));
        let tab = self.active_tab.and_then(|index| self.tabs.get(index));

        self.view = self.input_value.with(|text| {
            pipeline::compute(&PipelineInput {
                resident: &self.resident,
                tab,
                sync_filter,
                input_text: text,
                item_to_string: &self.item_to_string,
                custom_item,
                actions: &self.actions,
                grouping: &self.grouping,
            })
        });

        self.reconcile_active();
    }

    /// Whether the highlighted index, not the active entry, is the source of
    /// truth for the pair. Only when the caller controls the index alone.
    fn index_driven(&self) -> bool {
        self.highlighted.is_controlled() && !self.active.is_controlled()
    }

    /// The active entry and its index, resolved from whichever slice is the
    /// source of truth.
    fn active_pair(&self) -> Option<(Entry<T>, usize)> {
        if self.index_driven() {
            let index = self.highlighted.get()?;
            return self.view.get(index).map(|entry| (entry.clone(), index));
        }
        let active = self.active.get()?;
        match self.highlighted.get() {
            Some(index) if self.view.get(index) == Some(&active) => Some((active, index)),
            _ => self.view.position(&active).map(|index| (active, index)),
        }
    }

    /// Whether the caller was already asked for this pair and has not synced.
    fn is_pair_pending(&self, entry: &Option<Entry<T>>, index: Option<usize>) -> bool {
        let active_controlled = self.active.is_controlled();
        let highlighted_controlled = self.highlighted.is_controlled();
        (active_controlled || highlighted_controlled)
            && (!active_controlled || self.active.is_pending(entry))
            && (!highlighted_controlled || self.highlighted.is_pending(&index))
    }

    fn request_pair_once(&mut self, entry: Option<Entry<T>>, index: Option<usize>) {
        if !self.is_pair_pending(&entry, index) {
            self.set_active_pair(entry, index);
        }
    }

    fn reconcile_active(&mut self) {
        let current = self.active_pair();

        if self.view.len() == 1 {
            let only = self.view.flattened()[0].clone();
            if current.as_ref().map(|(entry, _)| entry) != Some(&only) {
                tracing::trace!(target: targets::NAVIGATION, "auto-highlighting the only entry");
                self.request_pair_once(Some(only), Some(0));
            }
            return;
        }

        let stale = current.is_none()
            && if self.index_driven() {
                self.highlighted.with(Option::is_some)
            } else {
                self.active.with(Option::is_some)
            };
        if stale {
            tracing::trace!(target: targets::NAVIGATION, "active entry left the list");
            self.request_pair_once(None, None);
        }
    }
}

impl<T: AutocompleteItem + fmt::Debug> fmt::Debug for Autocomplete<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autocomplete")
            .field("mode", &self.settings.mode)
            .field("input_value", &self.input_value)
            .field("open", &self.open)
            .field("active", &self.active)
            .field("active_tab", &self.active_tab)
            .field("flattened", &self.view.len())
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}
