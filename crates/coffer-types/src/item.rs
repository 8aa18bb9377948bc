//! The two kinds of tree item, and a borrowed handle over either.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::ids::ItemUuid;
use crate::time::Timestamp;
use crate::tree::{Entry, Group};

/// Which variant a [`StructureItem`] is.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ItemKind {
    #[strum(serialize = "group")]
    Group,
    #[strum(serialize = "entry")]
    Entry,
}

impl ItemKind {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Group => "group",
            ItemKind::Entry => "entry",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A borrowed group or entry.
///
/// Indexes hand these out instead of owning copies of the tree, so every
/// lookup result points back into the snapshot that was indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructureItem<'a> {
    Group(&'a Group),
    Entry(&'a Entry),
}

impl<'a> StructureItem<'a> {
    pub fn uuid(&self) -> ItemUuid {
        match self {
            StructureItem::Group(g) => g.uuid,
            StructureItem::Entry(e) => e.uuid,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            StructureItem::Group(_) => ItemKind::Group,
            StructureItem::Entry(_) => ItemKind::Entry,
        }
    }

    /// Last time the item moved within the tree.
    pub fn location_changed(&self) -> Timestamp {
        match self {
            StructureItem::Group(g) => g.location_changed,
            StructureItem::Entry(e) => e.location_changed,
        }
    }

    pub fn as_group(&self) -> Option<&'a Group> {
        match *self {
            StructureItem::Group(g) => Some(g),
            StructureItem::Entry(_) => None,
        }
    }

    pub fn as_entry(&self) -> Option<&'a Entry> {
        match *self {
            StructureItem::Entry(e) => Some(e),
            StructureItem::Group(_) => None,
        }
    }

    /// True when both handles point at the very same node, not merely an equal one.
    pub fn ptr_eq(&self, other: &StructureItem<'_>) -> bool {
        match (self, other) {
            (StructureItem::Group(a), StructureItem::Group(b)) => std::ptr::eq(*a, *b),
            (StructureItem::Entry(a), StructureItem::Entry(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl<'a> From<&'a Group> for StructureItem<'a> {
    fn from(group: &'a Group) -> Self {
        StructureItem::Group(group)
    }
}

impl<'a> From<&'a Entry> for StructureItem<'a> {
    fn from(entry: &'a Entry) -> Self {
        StructureItem::Entry(entry)
    }
}
