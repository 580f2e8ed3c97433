//! The item pipeline.
//!
//! Turns the resident item set into what is rendered and navigated:
//!
//! 1. tab pre-filter (active tab's predicate)
//! 2. synchronous match filter, only when no async filter is configured
//! 3. custom-value injection
//! 4. action weaving (top actions, items, bottom actions)
//!
//! With a grouping definition, steps 3 and 4 are skipped: the working set is
//! grouped and the navigable sequence is the depth-first flattening of the
//! group tree.

use horizon_autocomplete_core::logging::targets;

use crate::config::{CaseSensitivity, CustomItemFn, ItemToStringFn, MatchMode};
use crate::grouping::{build_groups, flatten_groups, Group, GroupingLevel};
use crate::item::{ActionItem, Entry, Placement};
use crate::tabs::Tab;

/// Everything the pipeline reads.
pub struct PipelineInput<'a, T> {
    /// The resident items (configured, replaced by `set_items` or async results).
    pub resident: &'a [T],
    /// The active tab, if tabs are configured.
    pub tab: Option<&'a Tab<T>>,
    /// Synchronous match filter; `None` when an async filter owns filtering.
    pub sync_filter: Option<(MatchMode, CaseSensitivity)>,
    /// Current input text.
    pub input_text: &'a str,
    /// Display projection.
    pub item_to_string: &'a ItemToStringFn<T>,
    /// Custom item factory; `None` when custom values are not allowed.
    pub custom_item: Option<&'a CustomItemFn<T>>,
    /// Configured action rows.
    pub actions: &'a [ActionItem],
    /// Grouping levels; empty for a flat list.
    pub grouping: &'a [GroupingLevel<T>],
}

/// What the renderer draws.
#[derive(Debug, PartialEq)]
pub enum RenderedItems<'a, T> {
    /// A flat list of items and action rows.
    Flat(&'a [Entry<T>]),
    /// A tree of groups.
    Grouped(&'a [Group<T>]),
}

/// The pipeline's output.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView<T> {
    working: Vec<T>,
    groups: Option<Vec<Group<T>>>,
    flattened: Vec<Entry<T>>,
}

impl<T> Default for ItemView<T> {
    fn default() -> Self {
        Self {
            working: Vec::new(),
            groups: None,
            flattened: Vec::new(),
        }
    }
}

impl<T: PartialEq> ItemView<T> {
    /// Items after the tab and match filters, before custom value and actions.
    pub fn working(&self) -> &[T] {
        &self.working
    }

    /// The rendering-facing result.
    pub fn rendered(&self) -> RenderedItems<'_, T> {
        match &self.groups {
            Some(groups) => RenderedItems::Grouped(groups),
            None => RenderedItems::Flat(&self.flattened),
        }
    }

    /// The group tree, when grouping is configured.
    pub fn groups(&self) -> Option<&[Group<T>]> {
        self.groups.as_deref()
    }

    /// The navigable sequence.
    pub fn flattened(&self) -> &[Entry<T>] {
        &self.flattened
    }

    /// Number of navigable entries.
    pub fn len(&self) -> usize {
        self.flattened.len()
    }

    /// Whether there is nothing to navigate.
    pub fn is_empty(&self) -> bool {
        self.flattened.is_empty()
    }

    /// The entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Entry<T>> {
        self.flattened.get(index)
    }

    /// Position of `entry` in the navigable sequence.
    pub fn position(&self, entry: &Entry<T>) -> Option<usize> {
        self.flattened.iter().position(|e| e == entry)
    }

    /// Position of a real item in the navigable sequence.
    pub fn position_of_item(&self, item: &T) -> Option<usize> {
        self.flattened
            .iter()
            .position(|e| e.as_item().is_some_and(|i| i == item))
    }

    /// Whether `entry` is currently navigable.
    pub fn contains(&self, entry: &Entry<T>) -> bool {
        self.flattened.contains(entry)
    }
}

/// Whether typed `text` should be offered as a custom entry over `working`.
///
/// True when the text is not blank and no item's display string equals it
/// exactly.
pub fn offers_custom_value<T>(working: &[T], text: &str, item_to_string: &ItemToStringFn<T>) -> bool {
    !text.trim().is_empty() && !working.iter().any(|item| item_to_string(item) == text)
}

/// Place actions around `items`: top actions first, bottom actions last.
///
/// Actions marked "show when empty" are dropped unless `items` is empty.
pub fn weave_actions<T>(items: Vec<T>, actions: &[ActionItem]) -> Vec<Entry<T>> {
    let base_is_empty = items.is_empty();
    let visible = actions
        .iter()
        .filter(|action| !action.show_when_empty() || base_is_empty);

    let (top, bottom): (Vec<&ActionItem>, Vec<&ActionItem>) =
        visible.partition(|action| action.placement() == Placement::Top);

    let mut woven = Vec::with_capacity(top.len() + items.len() + bottom.len());
    woven.extend(top.into_iter().cloned().map(Entry::Action));
    woven.extend(items.into_iter().map(Entry::Item));
    woven.extend(bottom.into_iter().cloned().map(Entry::Action));
    woven
}

/// Run the pipeline.
pub fn compute<T: Clone + PartialEq>(input: &PipelineInput<'_, T>) -> ItemView<T> {
    let text = input.input_text;
    let working: Vec<T> = input
        .resident
        .iter()
        .filter(|item| input.tab.is_none_or(|tab| tab.accepts(item)))
        .filter(|item| {
            input.sync_filter.is_none_or(|(mode, case)| {
                mode.matches(&(input.item_to_string)(item), text, case)
            })
        })
        .cloned()
        .collect();

    if !input.grouping.is_empty() {
        let groups = build_groups(&working, input.grouping);
        let flattened = flatten_groups(&groups).into_iter().map(Entry::Item).collect();
        tracing::trace!(
            target: targets::PIPELINE,
            resident = input.resident.len(),
            working = working.len(),
            groups = groups.len(),
            "recomputed grouped view"
        );
        return ItemView {
            working,
            groups: Some(groups),
            flattened,
        };
    }

    let mut items = working.clone();
    if let Some(factory) = input.custom_item
        && offers_custom_value(&working, text, input.item_to_string)
    {
        items.push(factory(text));
    }

    let flattened = weave_actions(items, input.actions);
    tracing::trace!(
        target: targets::PIPELINE,
        resident = input.resident.len(),
        working = working.len(),
        flattened = flattened.len(),
        "recomputed flat view"
    );
    ItemView {
        working,
        groups: None,
        flattened,
    }
}
