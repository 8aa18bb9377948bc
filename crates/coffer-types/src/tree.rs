//! The group/entry tree of a password store.
//!
//! A `Group` is a folder: an ordered list of entries followed by an ordered
//! list of sub-groups. An `Entry` is a leaf record. Both carry an [`ItemUuid`]
//! that identifies them across snapshots and a `location_changed` timestamp
//! recording the last time the item moved within the tree.
//!
//! Child order is significant. Indexes built over the tree encode it, and two
//! snapshots that differ only in sibling order are different snapshots.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::ids::ItemUuid;
use crate::time::Timestamp;

/// Maximum expected tree depth. Traversal code uses this as a circuit breaker.
///
/// Real stores rarely nest past a dozen levels. Exceeding 512 almost certainly
/// means a generated or corrupted tree.
pub const MAX_TREE_DEPTH: usize = 512;

/// A leaf record (login, note, card...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub uuid: ItemUuid,
    #[serde(default)]
    pub title: String,
    /// Last time this entry was moved to a different place in the tree.
    #[serde(default)]
    pub location_changed: Timestamp,
}

impl Entry {
    /// Create an entry with a fresh identity.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_uuid(ItemUuid::new(), title)
    }

    pub fn with_uuid(uuid: ItemUuid, title: impl Into<String>) -> Self {
        Self {
            uuid,
            title: title.into(),
            location_changed: Timestamp::now(),
        }
    }

    pub fn with_location_changed(mut self, at: Timestamp) -> Self {
        self.location_changed = at;
        self
    }

    pub fn uuid(&self) -> ItemUuid {
        self.uuid
    }

    pub fn location_changed(&self) -> Timestamp {
        self.location_changed
    }
}

/// A folder holding entries and nested groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub uuid: ItemUuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location_changed: Timestamp,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Entry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
}

impl Group {
    /// Create an empty group with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_uuid(ItemUuid::new(), name)
    }

    pub fn with_uuid(uuid: ItemUuid, name: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            location_changed: Timestamp::now(),
            entries: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_location_changed(mut self, at: Timestamp) -> Self {
        self.location_changed = at;
        self
    }

    /// Builder-style: append an entry.
    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Builder-style: append a sub-group.
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Append an entry, returning its identity.
    pub fn push_entry(&mut self, entry: Entry) -> ItemUuid {
        let uuid = entry.uuid;
        self.entries.push(entry);
        uuid
    }

    /// Append a sub-group, returning a handle to it for further nesting.
    pub fn push_group(&mut self, group: Group) -> &mut Group {
        self.groups.push(group);
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    pub fn uuid(&self) -> ItemUuid {
        self.uuid
    }

    pub fn location_changed(&self) -> Timestamp {
        self.location_changed
    }

    /// Direct child entries, in order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Direct sub-groups, in order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Pre-order walk of everything below this group.
    ///
    /// For each group the entries are visited first, then each sub-group is
    /// passed to `on_group` and walked before its next sibling. `self` is not
    /// passed to `on_group`. Returns `false` if a callback broke the walk.
    pub fn traverse_tree<'a, G, E>(&'a self, mut on_group: G, mut on_entry: E) -> bool
    where
        G: FnMut(&'a Group) -> ControlFlow<()>,
        E: FnMut(&'a Entry) -> ControlFlow<()>,
    {
        for entry in &self.entries {
            if on_entry(entry).is_break() {
                return false;
            }
        }

        let mut stack: Vec<&'a Group> = self.groups.iter().rev().collect();
        while let Some(group) = stack.pop() {
            if on_group(group).is_break() {
                return false;
            }
            for entry in &group.entries {
                if on_entry(entry).is_break() {
                    return false;
                }
            }
            stack.extend(group.groups.iter().rev());
        }
        true
    }

    /// Count `(groups, entries)` below this group, excluding the group itself.
    pub fn count_items(&self) -> (usize, usize) {
        let mut groups = 0;
        let mut entries = 0;
        self.traverse_tree(
            |_| {
                groups += 1;
                ControlFlow::Continue(())
            },
            |_| {
                entries += 1;
                ControlFlow::Continue(())
            },
        );
        (groups, entries)
    }

    /// Depth of the deepest group below this one (0 when there are no sub-groups).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(usize, &Group)> = self.groups.iter().map(|g| (1, g)).collect();
        while let Some((depth, group)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(group.groups.iter().map(|g| (depth + 1, g)));
        }
        deepest
    }
}

// ============================================================================
// Tests
// ============================================================================
