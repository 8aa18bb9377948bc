//! Shared identity and tree types for coffer.
//!
//! This crate is the model layer: typed IDs, timestamps, and the group/entry
//! tree of a password store. It has **no internal coffer dependencies**; the
//! indexing engine builds on it.
//!
//! # Model Overview
//!
//! ```text
//! Group (ItemUuid) ← folder
//!     └── entries: ordered Entry list
//!     └── groups:  ordered sub-Group list
//!
//! Entry (ItemUuid) ← leaf record
//!
//! StructureItem ← borrowed Group | Entry, what indexes hand out
//! SnapshotId    ← names one indexed view of a tree
//! ```
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`Group`]         | Folder with ordered entries and sub-groups   |
//! | [`Entry`]         | Leaf record                                  |
//! | [`StructureItem`] | Borrowed handle over either variant          |
//! | [`ItemKind`]      | Variant tag                                  |
//! | [`ItemUuid`]      | Identity of an item across snapshots         |
//! | [`SnapshotId`]    | Identity of one indexed snapshot             |
//! | [`Timestamp`]     | Unix milliseconds                            |
//! |-------------------|----------------------------------------------|

pub mod ids;
pub mod item;
pub mod time;
pub mod tree;

pub use ids::{ItemUuid, SnapshotId};
pub use item::{ItemKind, StructureItem};
pub use time::Timestamp;
pub use tree::{Entry, Group, MAX_TREE_DEPTH};
