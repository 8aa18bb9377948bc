//! Identity and structural indexing for syncing coffer trees.
//!
//! Reconciling two snapshots of a password store needs three things from
//! each snapshot before any merge decision is made:
//!
//! - **[`IdentityPool`]**: O(1) lookup of a group or entry by UUID.
//! - **[`IndexedIdentitySpace`]**: a dense integer id per item where integer
//!   order mirrors tree order, so sibling runs and subtree ranges can be
//!   compared with arithmetic alone.
//! - **[`CorrespondenceGroup`]**: for one UUID, every copy found across the
//!   snapshots and which snapshot moved its copy most recently.
//!
//! # Lifetimes
//!
//! Pools and spaces borrow the tree they index and are never updated. Edit
//! the tree, then rebuild. A `CorrespondenceGroup` borrows the spaces it
//! refers to.
//!
//! # Duplicate UUIDs
//!
//! A snapshot is expected to use each UUID once. [`IndexConfig::duplicates`]
//! decides what happens when it doesn't: fail the build (default) or let the
//! later item win with a warning.

mod config;
mod correspondence;
mod error;
mod pool;
mod space;

pub use config::{DuplicatePolicy, IndexConfig};
pub use correspondence::{Correspondence, CorrespondenceGroup};
pub use error::IndexError;
pub use pool::IdentityPool;
pub use space::{IndexedIdentitySpace, NOT_FOUND_ID, RESERVED_HOLE_ID, ROOT_ID};

/// Result type for index construction.
pub type Result<T> = std::result::Result<T, IndexError>;
