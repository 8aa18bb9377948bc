//! UUID → item lookup over one snapshot.
//!
//! The pool is a read-only view: built once by a pre-order walk of the tree,
//! never updated. Rebuild it after the tree changes.

use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;

use coffer_types::{Group, ItemKind, ItemUuid, StructureItem};

use crate::{DuplicatePolicy, IndexConfig, IndexError, Result};

/// Every group and entry of one snapshot, keyed by UUID.
#[derive(Debug, Clone, Default)]
pub struct IdentityPool<'a> {
    items: HashMap<ItemUuid, StructureItem<'a>>,
}

impl<'a> IdentityPool<'a> {
    /// Build a pool with the default configuration.
    ///
    /// With `entries_only` set, groups (the root included) are skipped.
    pub fn build(root: Option<&'a Group>, entries_only: bool) -> Result<Self> {
        Self::build_with(root, entries_only, &IndexConfig::default())
    }

    pub fn build_with(root: Option<&'a Group>, entries_only: bool, config: &IndexConfig) -> Result<Self> {
        let root = root.ok_or(IndexError::MissingRoot)?;

        // Pre-order: a group is stored when popped, then its entries; its
        // sub-groups go back on the stack in reverse.
        let mut pool = Self::default();
        let mut stack: Vec<(usize, &'a Group)> = vec![(0, root)];
        while let Some((depth, group)) = stack.pop() {
            if depth > config.max_depth {
                return Err(IndexError::DepthExceeded { limit: config.max_depth });
            }
            if !entries_only {
                pool.insert(StructureItem::Group(group), config.duplicates)?;
            }
            for entry in group.entries() {
                pool.insert(StructureItem::Entry(entry), config.duplicates)?;
            }
            stack.extend(group.groups().iter().rev().map(|sub| (depth + 1, sub)));
        }

        tracing::debug!(
            root = %root.uuid(),
            items = pool.len(),
            entries_only,
            "built identity pool"
        );
        Ok(pool)
    }

    fn insert(&mut self, item: StructureItem<'a>, policy: DuplicatePolicy) -> Result<()> {
        match self.items.entry(item.uuid()) {
            MapEntry::Vacant(slot) => {
                slot.insert(item);
            }
            MapEntry::Occupied(mut slot) => {
                let first = slot.get().kind();
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(IndexError::DuplicateIdentity {
                            uuid: item.uuid(),
                            first,
                            second: item.kind(),
                        });
                    }
                    DuplicatePolicy::LastWriteWins => {
                        tracing::warn!(uuid = %item.uuid(), %first, second = %item.kind(), "duplicate identity in snapshot, keeping later item");
                        slot.insert(item);
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up an item. A miss is `None`, never an error.
    pub fn get(&self, uuid: &ItemUuid) -> Option<StructureItem<'a>> {
        self.items.get(uuid).copied()
    }

    pub fn contains(&self, uuid: &ItemUuid) -> bool {
        self.items.contains_key(uuid)
    }

    /// True when every stored item is of `kind`. An empty pool qualifies.
    pub fn contains_only_kind(&self, kind: ItemKind) -> bool {
        self.items.values().all(|item| item.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored UUIDs, in no particular order.
    pub fn uuids(&self) -> impl Iterator<Item = ItemUuid> + '_ {
        self.items.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemUuid, StructureItem<'a>)> + '_ {
        self.items.iter().map(|(uuid, item)| (*uuid, *item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_types::Entry;
    use std::collections::BTreeSet;

    fn sample() -> Group {
        Group::new("Root")
            .with_entry(Entry::new("A"))
            .with_entry(Entry::new("B"))
            .with_group(Group::new("G1").with_entry(Entry::new("C")))
            .with_group(Group::new("G2"))
    }

    #[test]
    fn test_missing_root_is_error() {
        assert!(matches!(IdentityPool::build(None, false), Err(IndexError::MissingRoot)));
        assert!(matches!(IdentityPool::build(None, true), Err(IndexError::MissingRoot)));
    }

    #[test]
    fn test_full_pool_includes_root_and_groups() {
        let root = sample();
        let pool = IdentityPool::build(Some(&root), false).unwrap();

        assert_eq!(pool.len(), 6);
        let found = pool.get(&root.uuid).unwrap();
        assert!(found.ptr_eq(&StructureItem::Group(&root)));
        assert_eq!(pool.get(&root.groups[0].entries[0].uuid).unwrap().kind(), ItemKind::Entry);
    }

    #[test]
    fn test_entries_only_pool() {
        let root = sample();
        let pool = IdentityPool::build(Some(&root), true).unwrap();

        assert_eq!(pool.len(), 3);
        assert!(!pool.contains(&root.uuid));
        assert!(!pool.contains(&root.groups[1].uuid));
        assert!(pool.contains_only_kind(ItemKind::Entry));
    }

    #[test]
    fn test_contains_only_kind() {
        let root = sample();
        let full = IdentityPool::build(Some(&root), false).unwrap();
        assert!(!full.contains_only_kind(ItemKind::Entry));
        assert!(!full.contains_only_kind(ItemKind::Group));

        let empty = IdentityPool::default();
        assert!(empty.contains_only_kind(ItemKind::Entry));
        assert!(empty.contains_only_kind(ItemKind::Group));

        let bare = Group::new("Bare");
        let entries = IdentityPool::build(Some(&bare), true).unwrap();
        assert!(entries.is_empty());
        assert!(entries.contains_only_kind(ItemKind::Entry));
    }

    #[test]
    fn test_miss_is_none() {
        let root = sample();
        let pool = IdentityPool::build(Some(&root), false).unwrap();
        assert!(pool.get(&ItemUuid::new()).is_none());
    }

    #[test]
    fn test_duplicate_rejected_by_default() {
        let shared = ItemUuid::new();
        let root = Group::new("Root")
            .with_entry(Entry::with_uuid(shared, "first"))
            .with_group(Group::new("G").with_entry(Entry::with_uuid(shared, "second")));

        match IdentityPool::build(Some(&root), false) {
            Err(IndexError::DuplicateIdentity { uuid, first, second }) => {
                assert_eq!(uuid, shared);
                assert_eq!(first, ItemKind::Entry);
                assert_eq!(second, ItemKind::Entry);
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_group_and_root() {
        let shared = ItemUuid::new();
        let root = Group::with_uuid(shared, "Root").with_group(Group::with_uuid(shared, "Twin"));

        assert!(IdentityPool::build(Some(&root), false).is_err());
        // Groups are skipped entirely in an entries-only pool.
        assert!(IdentityPool::build(Some(&root), true).is_ok());
    }

    #[test]
    fn test_duplicate_last_write_wins() {
        let shared = ItemUuid::new();
        let root = Group::new("Root")
            .with_entry(Entry::with_uuid(shared, "first"))
            .with_group(Group::new("G").with_entry(Entry::with_uuid(shared, "second")));

        let config = IndexConfig::default().with_duplicates(DuplicatePolicy::LastWriteWins);
        let pool = IdentityPool::build_with(Some(&root), false, &config).unwrap();

        let kept = pool.get(&shared).and_then(|item| item.as_entry()).unwrap();
        assert_eq!(kept.title, "second");
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_uuids_match_contents() {
        let root = sample();
        let g1 = &root.groups[0];

        let full = IdentityPool::build(Some(&root), false).unwrap();
        let got: BTreeSet<ItemUuid> = full.uuids().collect();
        let want: BTreeSet<ItemUuid> = [
            root.uuid,
            root.entries[0].uuid,
            root.entries[1].uuid,
            g1.uuid,
            g1.entries[0].uuid,
            root.groups[1].uuid,
        ]
        .into_iter()
        .collect();
        assert_eq!(got, want);

        let entries = IdentityPool::build(Some(&root), true).unwrap();
        let got: BTreeSet<ItemUuid> = entries.uuids().collect();
        let want: BTreeSet<ItemUuid> = [root.entries[0].uuid, root.entries[1].uuid, g1.entries[0].uuid]
            .into_iter()
            .collect();
        assert_eq!(got, want);
        assert_eq!(entries.uuids().count(), entries.len());
    }

    #[test]
    fn test_depth_limit_checked_during_walk() {
        // Depth counts groups below the root, whatever the entries_only setting.
        let root = Group::new("Root").with_group(
            Group::new("L1").with_group(Group::new("L2").with_entry(Entry::new("deep"))),
        );
        let config = IndexConfig::default().with_max_depth(1);
        assert!(matches!(
            IdentityPool::build_with(Some(&root), true, &config),
            Err(IndexError::DepthExceeded { limit: 1 })
        ));
        let pool = IdentityPool::build_with(Some(&root), true, &config.with_max_depth(2)).unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_depth_limit() {
        let root = Group::new("Root").with_group(Group::new("L1").with_group(Group::new("L2")));
        let config = IndexConfig::default().with_max_depth(1);
        assert!(matches!(
            IdentityPool::build_with(Some(&root), false, &config),
            Err(IndexError::DepthExceeded { limit: 1 })
        ));
        assert!(IdentityPool::build_with(Some(&root), false, &config.with_max_depth(2)).is_ok());
    }
}
