//! Accessibility roles for combobox parts.

use serde::Serialize;

/// The accessibility role of a combobox part.
///
/// A small subset of WAI-ARIA roles; [`as_aria`](Self::as_aria) gives the
/// attribute value a host writes into its markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
#[non_exhaustive]
pub enum AccessibleRole {
    /// The composite text-input-plus-listbox widget.
    Combobox,

    /// The popup list of options.
    Listbox,

    /// A selectable entry within the listbox.
    Option,

    /// A set of related options.
    Group,

    /// An element with no semantics of its own (group headings).
    Presentation,

    /// A tab list container.
    TabList,

    /// A single tab.
    Tab,

    /// A push button (clear, disclosure).
    Button,

    /// A static text label.
    Label,

    /// A single-line text input field.
    TextInput,

    /// A hyperlink.
    Link,
}

impl AccessibleRole {
    /// The ARIA `role` attribute value.
    ///
    /// Labels and text inputs have no explicit role; native `label` and
    /// `input` elements carry it.
    pub fn as_aria(self) -> &'static str {
        match self {
            AccessibleRole::Combobox => "combobox",
            AccessibleRole::Listbox => "listbox",
            AccessibleRole::Option => "option",
            AccessibleRole::Group => "group",
            AccessibleRole::Presentation => "presentation",
            AccessibleRole::TabList => "tablist",
            AccessibleRole::Tab => "tab",
            AccessibleRole::Button => "button",
            AccessibleRole::Label => "label",
            AccessibleRole::TextInput => "textbox",
            AccessibleRole::Link => "link",
        }
    }
}

impl From<AccessibleRole> for &'static str {
    fn from(role: AccessibleRole) -> Self {
        role.as_aria()
    }
}
