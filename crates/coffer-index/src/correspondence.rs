//! Physical copies of one logical item across snapshots.
//!
//! When two or more snapshots of a store are reconciled, the same UUID turns
//! up once per snapshot. A [`CorrespondenceGroup`] gathers those copies and
//! remembers which snapshot moved its copy most recently, since that
//! snapshot's position for the item is the one a merge should keep.

use std::collections::BTreeMap;

use coffer_types::{ItemUuid, StructureItem, Timestamp};

use crate::IndexedIdentitySpace;

/// The copies of one item, each paired with the space it was found in.
#[derive(Debug, Clone)]
pub struct CorrespondenceGroup<'s, 't, T> {
    members: Vec<(T, &'s IndexedIdentitySpace<'t>)>,
    newest: Option<(Timestamp, &'s IndexedIdentitySpace<'t>)>,
}

impl<'s, 't, T> Default for CorrespondenceGroup<'s, 't, T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            newest: None,
        }
    }
}

impl<'s, 't, T> CorrespondenceGroup<'s, 't, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one copy.
    ///
    /// Provenance moves to `origin` only when `location_changed` is strictly
    /// newer than anything seen so far; on a tie the earlier copy keeps it.
    /// The first copy always sets it.
    pub fn add(&mut self, item: T, location_changed: Timestamp, origin: &'s IndexedIdentitySpace<'t>) {
        self.members.push((item, origin));
        match self.newest {
            Some((newest, _)) if location_changed <= newest => {}
            _ => self.newest = Some((location_changed, origin)),
        }
    }

    /// The first copy added, regardless of recency.
    pub fn primary_item(&self) -> Option<&T> {
        self.members.first().map(|(item, _)| item)
    }

    /// Newest location-changed time seen, or [`Timestamp::MIN`] when empty.
    pub fn location_changed(&self) -> Timestamp {
        self.newest.map(|(at, _)| at).unwrap_or(Timestamp::MIN)
    }

    /// The space whose copy moved most recently.
    pub fn pool_assoc(&self) -> Option<&'s IndexedIdentitySpace<'t>> {
        self.newest.map(|(_, space)| space)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Copies in the order they were added.
    pub fn members(&self) -> impl Iterator<Item = (&T, &'s IndexedIdentitySpace<'t>)> + '_ {
        self.members.iter().map(|(item, space)| (item, *space))
    }
}

/// Correspondence groups for every UUID found in a set of spaces.
///
/// This only collects copies. Deciding what the merged tree looks like is
/// the caller's job.
#[derive(Debug, Clone, Default)]
pub struct Correspondence<'s, 't> {
    groups: BTreeMap<ItemUuid, CorrespondenceGroup<'s, 't, StructureItem<'t>>>,
}

impl<'s, 't> Correspondence<'s, 't> {
    /// Walk each space in argument order, items in id order, and file every
    /// item under its UUID.
    pub fn collect(spaces: &[&'s IndexedIdentitySpace<'t>]) -> Self {
        let mut groups: BTreeMap<ItemUuid, CorrespondenceGroup<'s, 't, StructureItem<'t>>> = BTreeMap::new();
        for &space in spaces {
            for (_, item) in space.iter() {
                groups
                    .entry(item.uuid())
                    .or_default()
                    .add(item, item.location_changed(), space);
            }
        }
        tracing::trace!(spaces = spaces.len(), uuids = groups.len(), "collected correspondences");
        Self { groups }
    }

    pub fn get(&self, uuid: &ItemUuid) -> Option<&CorrespondenceGroup<'s, 't, StructureItem<'t>>> {
        self.groups.get(uuid)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All groups in UUID order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemUuid, &CorrespondenceGroup<'s, 't, StructureItem<'t>>)> + '_ {
        self.groups.iter()
    }

    /// Only the UUIDs that turned up more than once.
    pub fn shared(&self) -> impl Iterator<Item = (&ItemUuid, &CorrespondenceGroup<'s, 't, StructureItem<'t>>)> + '_ {
        self.groups.iter().filter(|(_, group)| group.len() > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_types::{Entry, Group, SnapshotId};

    fn ts(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[test]
    fn test_empty_group_defaults() {
        let group: CorrespondenceGroup<'_, '_, &str> = CorrespondenceGroup::new();
        assert!(group.is_empty());
        assert!(group.primary_item().is_none());
        assert!(group.pool_assoc().is_none());
        assert_eq!(group.location_changed(), Timestamp::MIN);
    }

    #[test]
    fn test_first_strictly_newest_wins() {
        let trees: Vec<Group> = (0..4).map(|i| Group::new(format!("snapshot {i}"))).collect();
        let spaces: Vec<IndexedIdentitySpace<'_>> = trees
            .iter()
            .map(|t| IndexedIdentitySpace::build(Some(t)).unwrap())
            .collect();

        let mut group = CorrespondenceGroup::new();
        group.add("x1", ts(5), &spaces[0]);
        group.add("x2", ts(3), &spaces[1]);
        group.add("x3", ts(9), &spaces[2]);
        group.add("x4", ts(9), &spaces[3]);

        assert_eq!(group.location_changed(), ts(9));
        assert_eq!(group.pool_assoc().unwrap().snapshot_id(), spaces[2].snapshot_id());
        assert_eq!(group.primary_item(), Some(&"x1"));
        assert_eq!(group.len(), 4);
    }

    #[test]
    fn test_first_add_at_min_sets_provenance() {
        let tree = Group::new("only");
        let space = IndexedIdentitySpace::build(Some(&tree)).unwrap();

        let mut group = CorrespondenceGroup::new();
        group.add(1u8, Timestamp::MIN, &space);
        assert_eq!(group.pool_assoc().map(|s| s.snapshot_id()), Some(space.snapshot_id()));
        assert_eq!(group.location_changed(), Timestamp::MIN);
    }

    #[test]
    fn test_members_keep_insertion_order() {
        let trees = [Group::new("a"), Group::new("b")];
        let a = IndexedIdentitySpace::build(Some(&trees[0])).unwrap();
        let b = IndexedIdentitySpace::build(Some(&trees[1])).unwrap();

        let mut group = CorrespondenceGroup::new();
        group.add('p', ts(2), &b);
        group.add('q', ts(1), &a);

        let order: Vec<(char, SnapshotId)> = group
            .members()
            .map(|(item, space)| (*item, space.snapshot_id()))
            .collect();
        assert_eq!(order, vec![('p', b.snapshot_id()), ('q', a.snapshot_id())]);
    }

    #[test]
    fn test_collect_across_snapshots() {
        let moved = ItemUuid::new();
        let local_only = Entry::new("local only");
        let local = Group::with_uuid(ItemUuid::from_name("root"), "Root")
            .with_location_changed(ts(1))
            .with_entry(Entry::with_uuid(moved, "mail").with_location_changed(ts(10)))
            .with_entry(local_only.clone());
        let remote = Group::with_uuid(ItemUuid::from_name("root"), "Root")
            .with_location_changed(ts(1))
            .with_group(
                Group::new("Archive").with_entry(Entry::with_uuid(moved, "mail").with_location_changed(ts(20))),
            );

        let local_space = IndexedIdentitySpace::build(Some(&local)).unwrap();
        let remote_space = IndexedIdentitySpace::build(Some(&remote)).unwrap();
        let corr = Correspondence::collect(&[&local_space, &remote_space]);

        // root, mail, local only, Archive
        assert_eq!(corr.len(), 4);
        assert_eq!(corr.shared().count(), 2);

        let mail = corr.get(&moved).unwrap();
        assert_eq!(mail.len(), 2);
        assert_eq!(mail.location_changed(), ts(20));
        assert_eq!(mail.pool_assoc().unwrap().snapshot_id(), remote_space.snapshot_id());
        let primary = mail.primary_item().unwrap();
        assert_eq!(local_space.get_id(&primary.uuid()), 4);

        // Equal root timestamps: the first space listed keeps provenance.
        let root = corr.get(&local.uuid).unwrap();
        assert_eq!(root.pool_assoc().unwrap().snapshot_id(), local_space.snapshot_id());

        let solo = corr.get(&local_only.uuid).unwrap();
        assert_eq!(solo.len(), 1);
    }

    #[test]
    fn test_collect_nothing() {
        let corr = Correspondence::collect(&[]);
        assert!(corr.is_empty());
        assert_eq!(corr.iter().count(), 0);
    }
}
