//! Grouping of items into a tree of labelled groups.
//!
//! A grouping definition is an ordered list of [`GroupingLevel`]s. Items are
//! partitioned by the first level's key, each partition by the next level's
//! key, and so on. Keys appear in the order they are first seen.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Projection from an item to its group key at one level.
pub type GroupKeyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// One level of a grouping definition.
pub struct GroupingLevel<T> {
    key: GroupKeyFn<T>,
    label: String,
}

impl<T> GroupingLevel<T> {
    /// Create a grouping level.
    pub fn new(label: impl Into<String>, key: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            key: Arc::new(key),
            label: label.into(),
        }
    }

    /// The level's label (accessible name of its groups).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The group key of an item at this level.
    pub fn key_of(&self, item: &T) -> String {
        (self.key)(item)
    }
}

impl<T> Clone for GroupingLevel<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
        }
    }
}

impl<T> fmt::Debug for GroupingLevel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupingLevel")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A node of the group tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T> {
    /// The shared key of every item in this group.
    pub key: String,
    /// The label of the level this group belongs to.
    pub label: String,
    /// Zero-based nesting level.
    pub level: usize,
    /// All items in this group, in encounter order.
    pub items: Vec<T>,
    /// Partitions of `items` by the next level; empty at the last level.
    pub subgroups: Vec<Group<T>>,
}

impl<T> Group<T> {
    /// Whether this group is partitioned further.
    pub fn has_subgroups(&self) -> bool {
        !self.subgroups.is_empty()
    }
}

/// Build the group tree for `items`.
///
/// Returns an empty tree when `levels` is empty.
pub fn build_groups<T: Clone>(items: &[T], levels: &[GroupingLevel<T>]) -> Vec<Group<T>> {
    build_level(items, levels, 0)
}

fn build_level<T: Clone>(items: &[T], levels: &[GroupingLevel<T>], level: usize) -> Vec<Group<T>> {
    let Some(definition) = levels.get(level) else {
        return Vec::new();
    };

    let mut partitions: IndexMap<String, Vec<T>> = IndexMap::new();
    for item in items {
        partitions
            .entry(definition.key_of(item))
            .or_default()
            .push(item.clone());
    }

    partitions
        .into_iter()
        .map(|(key, items)| {
            let subgroups = build_level(&items, levels, level + 1);
            Group {
                key,
                label: definition.label.clone(),
                level,
                items,
                subgroups,
            }
        })
        .collect()
}

/// Recover the navigable item order from a group tree.
///
/// Depth-first: a group with subgroups contributes its subgroups' items, a
/// leaf group contributes its own items.
pub fn flatten_groups<T: Clone>(groups: &[Group<T>]) -> Vec<T> {
    let mut out = Vec::new();
    flatten_into(groups, &mut out);
    out
}

fn flatten_into<T: Clone>(groups: &[Group<T>], out: &mut Vec<T>) {
    for group in groups {
        if group.has_subgroups() {
            flatten_into(&group.subgroups, out);
        } else {
            out.extend(group.items.iter().cloned());
        }
    }
}
