//! Attribute bundles.
//!
//! Each bundle is plain data derived from the engine's current state, so a
//! renderer may ask for them in any order and as often as it likes. Bundles
//! serialize with kebab-case keys (`has-popup`, `active-descendant`, ...) for
//! hosts that forward them to markup.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::engine::{Autocomplete, AutocompleteItem};
use crate::grouping::Group;
use crate::item::{Entry, Mode, OptionLink};
use crate::role::AccessibleRole;

/// Help text for the input when tabs are configured.
pub const DESCRIPTION_WITH_TABS: &str = "Use Up and Down arrows to navigate options, Left and Right arrows to switch tabs, Enter to select, Escape to close.";

/// Help text for the input without tabs.
pub const DESCRIPTION: &str =
    "Use Up and Down arrows to navigate options, Enter to select, Escape to close.";

/// Accessible name of the clear control.
pub const CLEAR_LABEL: &str = "Clear input";

/// Per-render identifier of an option: its position in the flattened
/// sequence, rendered as `option-{index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(usize);

impl OptionId {
    /// The option's position in the flattened sequence.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option-{}", self.0)
    }
}

impl Serialize for OptionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The root container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RootAttributes {
    /// Always [`AccessibleRole::Combobox`].
    pub role: AccessibleRole,
    /// Whether the list is open.
    pub expanded: bool,
    /// Kind of popup the combobox owns; always a listbox.
    pub has_popup: AccessibleRole,
    /// Id of the listbox.
    pub controls: String,
    /// Whether the input has focus.
    pub focused: bool,
    /// Single or multiple selection.
    pub mode: Mode,
    /// Whether anything is selected.
    pub has_selected: bool,
    /// Whether the input text is not blank.
    pub has_value: bool,
}

/// The visible (or visually hidden) label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LabelAttributes {
    /// Id of the input the label names.
    pub for_id: String,
    /// The configured label text.
    pub text: String,
    /// Whether the label is for assistive technology only.
    pub visually_hidden: bool,
}

/// The text input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct InputAttributes {
    /// Id of the input element.
    pub id: String,
    /// The current input text.
    pub value: String,
    /// Always `"list"`.
    pub autocomplete: &'static str,
    /// Id of the listbox.
    pub controls: String,
    /// Whether the list is open.
    pub expanded: bool,
    /// Id of the active option, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_descendant: Option<OptionId>,
    /// Keyboard help; mentions tab switching when tabs are configured.
    pub description: &'static str,
}

/// The listbox container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListAttributes {
    /// Id of the listbox element.
    pub id: String,
    /// Always [`AccessibleRole::Listbox`].
    pub role: AccessibleRole,
    /// Accessible name, the configured label.
    pub label: String,
    /// Whether the list is open.
    pub open: bool,
    /// Whether there is nothing to navigate.
    pub empty: bool,
    /// Number of navigable entries.
    pub size: usize,
    /// Whether the list renders as a group tree.
    pub has_groups: bool,
}

/// One option, real item or action row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionAttributes {
    /// Per-render identifier.
    pub id: OptionId,
    /// Always [`AccessibleRole::Option`].
    pub role: AccessibleRole,
    /// One-based.
    pub pos_in_set: usize,
    /// Number of navigable entries.
    pub set_size: usize,
    /// Whether the item is selected; `false` for action rows.
    pub selected: bool,
    /// Whether this is the active entry.
    pub active: bool,
    /// Whether the caller marked the item disabled.
    pub disabled: bool,
    /// Whether the item is the synthetic entry for the typed text.
    pub custom: bool,
    /// Whether this is an action row.
    pub action: bool,
    /// Accessible name; set for action rows only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Focus index; set for action rows only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_index: Option<i32>,
}

/// An option rendered as a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionLinkAttributes {
    /// Per-render identifier; `None` when the item is not in the list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<OptionId>,
    /// Always [`AccessibleRole::Option`].
    pub role: AccessibleRole,
    /// Whether the item is selected.
    pub selected: bool,
    /// One-based; `0` when the item is not in the flattened sequence.
    pub pos_in_set: usize,
    /// Number of navigable entries.
    pub set_size: usize,
    /// Whether the caller marked the item disabled.
    pub disabled: bool,
    /// `-1` for disabled links, `0` otherwise.
    pub tab_index: i32,
    /// Link target, when the link projection returned a URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Caller-provided link attributes, forwarded unchanged.
    #[serde(flatten)]
    pub props: BTreeMap<String, String>,
}

/// A group container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupAttributes {
    /// Always [`AccessibleRole::Group`].
    pub role: AccessibleRole,
    /// Label of the grouping level.
    pub label: String,
    /// The group's key.
    pub key: String,
    /// Nesting depth, starting at 0.
    pub level: usize,
    /// Whether the group contains groups rather than items.
    pub has_subgroups: bool,
}

/// A group heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupLabelAttributes {
    /// Always [`AccessibleRole::Presentation`].
    pub role: AccessibleRole,
    /// Heading text, the group's key.
    pub heading: String,
}

/// The tab list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TabListAttributes {
    /// Always [`AccessibleRole::TabList`].
    pub role: AccessibleRole,
    /// Id of the listbox the tabs filter.
    pub controls: String,
}

/// One tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TabAttributes {
    /// `{prefix}-tab-{key}`.
    pub id: String,
    /// Always [`AccessibleRole::Tab`].
    pub role: AccessibleRole,
    /// Tab label.
    pub label: String,
    /// Whether this is the active tab.
    pub selected: bool,
    /// `0` for the active tab, `-1` otherwise.
    pub tab_index: i32,
    /// Resident items the tab's predicate accepts.
    pub item_count: usize,
}

/// The clear control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClearAttributes {
    /// Always [`AccessibleRole::Button`].
    pub role: AccessibleRole,
    /// Accessible name, [`CLEAR_LABEL`].
    pub label: &'static str,
    /// Set when the input is empty and nothing is selected.
    pub disabled: bool,
}

/// The disclosure (open/close) control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DisclosureAttributes {
    /// Always [`AccessibleRole::Button`].
    pub role: AccessibleRole,
    /// "Hide options" when open, "Show options" when closed.
    pub label: &'static str,
    /// Whether the list is open.
    pub expanded: bool,
    /// Id of the listbox.
    pub controls: String,
}

impl<T: AutocompleteItem> Autocomplete<T> {
    /// Id of the input element.
    pub fn input_id(&self) -> String {
        format!("{}-input", self.settings.id_prefix)
    }

    /// Id of the listbox element.
    pub fn listbox_id(&self) -> String {
        format!("{}-listbox", self.settings.id_prefix)
    }

    /// Id of the tab with `key`.
    pub fn tab_id(&self, key: &str) -> String {
        format!("{}-tab-{}", self.settings.id_prefix, key)
    }

    /// Attributes of the root container.
    pub fn root_attributes(&self) -> RootAttributes {
        RootAttributes {
            role: AccessibleRole::Combobox,
            expanded: self.is_open(),
            has_popup: AccessibleRole::Listbox,
            controls: self.listbox_id(),
            focused: self.is_focused(),
            mode: self.mode(),
            has_selected: self.has_selection(),
            has_value: self.input_value.with(|text| !text.trim().is_empty()),
        }
    }

    /// Attributes of the label.
    pub fn label_attributes(&self) -> LabelAttributes {
        LabelAttributes {
            for_id: self.input_id(),
            text: self.settings.label.clone(),
            visually_hidden: self.settings.label_visually_hidden,
        }
    }

    /// Attributes of the text input.
    pub fn input_attributes(&self) -> InputAttributes {
        InputAttributes {
            id: self.input_id(),
            value: self.input_value(),
            autocomplete: "list",
            controls: self.listbox_id(),
            expanded: self.is_open(),
            active_descendant: self.highlighted_index().map(OptionId),
            description: if self.tabs.is_empty() {
                DESCRIPTION
            } else {
                DESCRIPTION_WITH_TABS
            },
        }
    }

    /// Attributes of the listbox.
    pub fn list_attributes(&self) -> ListAttributes {
        ListAttributes {
            id: self.listbox_id(),
            role: AccessibleRole::Listbox,
            label: self.settings.label.clone(),
            open: self.is_open(),
            empty: self.view.is_empty(),
            size: self.view.len(),
            has_groups: self.view.groups().is_some(),
        }
    }

    /// Attributes of the entry at `index` of the flattened sequence.
    pub fn option_attributes(&self, index: usize) -> Option<OptionAttributes> {
        let entry = self.view.get(index)?;
        let active = self.highlighted_index() == Some(index);
        let set_size = self.view.len();

        Some(match entry {
            Entry::Item(item) => OptionAttributes {
                id: OptionId(index),
                role: AccessibleRole::Option,
                pos_in_set: index + 1,
                set_size,
                selected: self.is_selected(item),
                active,
                disabled: self.is_item_disabled(item),
                custom: self.is_custom_value(item),
                action: false,
                label: None,
                tab_index: None,
            },
            Entry::Action(action) => OptionAttributes {
                id: OptionId(index),
                role: AccessibleRole::Option,
                pos_in_set: index + 1,
                set_size,
                selected: false,
                active,
                disabled: false,
                custom: false,
                action: true,
                label: Some(action.label().to_string()),
                tab_index: Some(0),
            },
        })
    }

    /// Attributes of `item` rendered as a link.
    pub fn option_link_attributes(&self, item: &T) -> OptionLinkAttributes {
        let index = self.view.position_of_item(item);
        let disabled = self.is_item_disabled(item);
        let (href, props) = match self.option_link.as_ref().and_then(|link| link(item)) {
            Some(OptionLink::Href(url)) => (Some(url), BTreeMap::new()),
            Some(OptionLink::Props(props)) => (None, props),
            None => (None, BTreeMap::new()),
        };

        OptionLinkAttributes {
            id: index.map(OptionId),
            role: AccessibleRole::Option,
            selected: self.is_selected(item),
            pos_in_set: index.map_or(0, |i| i + 1),
            set_size: self.view.len(),
            disabled,
            tab_index: if disabled { -1 } else { 0 },
            href,
            props,
        }
    }

    /// Attributes of a group container.
    pub fn group_attributes(&self, group: &Group<T>) -> GroupAttributes {
        GroupAttributes {
            role: AccessibleRole::Group,
            label: group.label.clone(),
            key: group.key.clone(),
            level: group.level,
            has_subgroups: group.has_subgroups(),
        }
    }

    /// Attributes of a group heading.
    pub fn group_label_attributes(&self, group: &Group<T>) -> GroupLabelAttributes {
        GroupLabelAttributes {
            role: AccessibleRole::Presentation,
            heading: group.key.clone(),
        }
    }

    /// Attributes of the tab list.
    pub fn tab_list_attributes(&self) -> TabListAttributes {
        TabListAttributes {
            role: AccessibleRole::TabList,
            controls: self.listbox_id(),
        }
    }

    /// Attributes of the tab at `index`.
    pub fn tab_attributes(&self, index: usize) -> Option<TabAttributes> {
        let tab = self.tabs.get(index)?;
        let state = self.tab_state(index)?;
        Some(TabAttributes {
            id: self.tab_id(tab.key()),
            role: AccessibleRole::Tab,
            label: tab.label().to_string(),
            selected: state.selected,
            tab_index: if state.selected { 0 } else { -1 },
            item_count: state.item_count,
        })
    }

    /// Attributes of the clear control.
    pub fn clear_attributes(&self) -> ClearAttributes {
        ClearAttributes {
            role: AccessibleRole::Button,
            label: CLEAR_LABEL,
            disabled: self.is_clear_disabled(),
        }
    }

    /// Attributes of the disclosure control.
    pub fn disclosure_attributes(&self) -> DisclosureAttributes {
        let open = self.is_open();
        DisclosureAttributes {
            role: AccessibleRole::Button,
            label: if open { "Hide options" } else { "Show options" },
            expanded: open,
            controls: self.listbox_id(),
        }
    }
}
