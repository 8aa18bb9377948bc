//! Dense integer addressing over one snapshot.
//!
//! Every group and entry gets a small integer id such that integer order
//! mirrors tree structure. A merge can then answer "are these siblings?",
//! "does this range nest in that one?" or "was something inserted here?" with
//! plain arithmetic instead of walking either tree.
//!
//! # Layout
//!
//! ```text
//! 0            not found (never assigned)
//! 1            hole
//! 2            root group
//! 3            hole
//! 4..          root's entries | hole | root's sub-groups | hole
//!              then each sub-group's own block, in sibling order,
//!              each one's whole subtree before the next sibling's
//! ```
//!
//! For `Root { entries: [A, B], groups: [G1 { entries: [C] }, G2] }`:
//!
//! ```text
//! Root=2  A=4 B=5  G1=7 G2=8  C=10  (3, 6, 9, 11..=14 are holes)
//! ```
//!
//! Ids are only meaningful within one build. Two snapshots are compared by
//! UUID, never by raw id.

use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;

use coffer_types::{Group, ItemUuid, SnapshotId, StructureItem};

use crate::{DuplicatePolicy, IndexConfig, IndexError, Result};

/// Returned by [`IndexedIdentitySpace::get_id`] on a miss.
pub const NOT_FOUND_ID: u64 = 0;
/// Permanently unassigned.
pub const RESERVED_HOLE_ID: u64 = 1;
/// Id of the root group in every non-empty space.
pub const ROOT_ID: u64 = 2;
/// First id handed to the root's children; 3 stays a hole.
const FIRST_CHILD_ID: usize = 4;

/// Bidirectional UUID ⇄ id mapping for one snapshot.
#[derive(Debug, Clone)]
pub struct IndexedIdentitySpace<'a> {
    snapshot: SnapshotId,
    ids: HashMap<ItemUuid, u64>,
    /// Indexed by id; `None` marks a hole. Length is the id bound.
    items: Vec<Option<StructureItem<'a>>>,
}

impl<'a> IndexedIdentitySpace<'a> {
    /// Index a tree with the default configuration.
    ///
    /// An absent root yields an empty space rather than an error.
    pub fn build(root: Option<&'a Group>) -> Result<Self> {
        Self::build_with(root, &IndexConfig::default())
    }

    pub fn build_with(root: Option<&'a Group>, config: &IndexConfig) -> Result<Self> {
        let mut space = Self {
            snapshot: SnapshotId::new(),
            ids: HashMap::new(),
            items: vec![None; ROOT_ID as usize],
        };
        let Some(root) = root else {
            tracing::debug!(snapshot = %space.snapshot, "built empty identity space");
            return Ok(space);
        };

        space.place(ROOT_ID as usize, StructureItem::Group(root), config.duplicates)?;

        // Explicit stack instead of recursion. Popping a group assigns its
        // entries and its immediate sub-groups in one go; the sub-groups are
        // pushed in reverse so the first one's whole subtree is numbered
        // before its next sibling's.
        let mut cursor = FIRST_CHILD_ID;
        let mut stack: Vec<(usize, &'a Group)> = vec![(0, root)];
        while let Some((depth, group)) = stack.pop() {
            if depth > config.max_depth {
                return Err(IndexError::DepthExceeded { limit: config.max_depth });
            }

            for entry in group.entries() {
                space.place(cursor, StructureItem::Entry(entry), config.duplicates)?;
                cursor += 1;
            }
            cursor += 1;

            for sub in group.groups() {
                space.place(cursor, StructureItem::Group(sub), config.duplicates)?;
                cursor += 1;
            }
            cursor += 1;

            stack.extend(group.groups().iter().rev().map(|sub| (depth + 1, sub)));
        }
        space.items.resize(cursor, None);

        tracing::debug!(
            snapshot = %space.snapshot,
            root = %root.uuid(),
            items = space.len(),
            id_bound = space.id_bound(),
            "built identity space"
        );
        Ok(space)
    }

    fn place(&mut self, id: usize, item: StructureItem<'a>, policy: DuplicatePolicy) -> Result<()> {
        match self.ids.entry(item.uuid()) {
            MapEntry::Vacant(slot) => {
                slot.insert(id as u64);
            }
            MapEntry::Occupied(mut slot) => {
                let first = self.items[*slot.get() as usize]
                    .map(|prev| prev.kind())
                    .unwrap_or(item.kind());
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(IndexError::DuplicateIdentity {
                            uuid: item.uuid(),
                            first,
                            second: item.kind(),
                        });
                    }
                    DuplicatePolicy::LastWriteWins => {
                        tracing::warn!(
                            snapshot = %self.snapshot,
                            uuid = %item.uuid(),
                            earlier_id = *slot.get(),
                            later_id = id,
                            "duplicate identity in snapshot, uuid now resolves to later id"
                        );
                        slot.insert(id as u64);
                    }
                }
            }
        }

        if self.items.len() <= id {
            self.items.resize(id + 1, None);
        }
        self.items[id] = Some(item);
        Ok(())
    }

    /// Which build this is. Fresh for every build, even of the same tree.
    pub fn snapshot_id(&self) -> SnapshotId {
        self.snapshot
    }

    /// Id of `uuid`, or [`NOT_FOUND_ID`].
    pub fn get_id(&self, uuid: &ItemUuid) -> u64 {
        self.ids.get(uuid).copied().unwrap_or(NOT_FOUND_ID)
    }

    /// Item at `id`; `None` for holes, sentinels and ids past the bound.
    pub fn get_item(&self, id: u64) -> Option<StructureItem<'a>> {
        let index = usize::try_from(id).ok()?;
        self.items.get(index).copied().flatten()
    }

    pub fn get_item_by_uuid(&self, uuid: &ItemUuid) -> Option<StructureItem<'a>> {
        match self.get_id(uuid) {
            NOT_FOUND_ID => None,
            id => self.get_item(id),
        }
    }

    /// Number of UUIDs that resolve to an id.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// One past the largest id the build reserved, trailing holes included.
    pub fn id_bound(&self) -> u64 {
        self.items.len() as u64
    }

    /// True for any unassigned id below the bound, the sentinels included.
    pub fn is_hole(&self, id: u64) -> bool {
        id < self.id_bound() && self.get_item(id).is_none()
    }

    /// Assigned `(id, item)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, StructureItem<'a>)> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(id, item)| item.map(|item| (id as u64, item)))
    }
}
