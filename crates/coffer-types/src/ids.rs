//! Typed identifiers for tree items and indexed snapshots.
//!
//! Both ID types wrap a UUID. They're opaque 16-byte values and display as
//! standard UUID text for logging. The `short()` form (first 8 hex chars) is
//! for human-facing output only, never a lookup key.
//!
//! `ItemUuid` is the identity a group or entry carries across snapshots of the
//! same store. `SnapshotId` names one built identity space so provenance can be
//! compared by value and printed in logs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a group or entry. Minted locally as UUIDv7, any UUID on import.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemUuid(uuid::Uuid);

/// Identity of one indexed snapshot (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(uuid::Uuid);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        #[allow(clippy::new_without_default)]
        impl $T {
            /// Create a new time-ordered ID (UUIDv7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// First 8 hex characters, for log lines and test output.
            pub fn short(&self) -> String {
                self.0.as_simple().to_string()[..8].to_string()
            }

            /// Parse hyphenated or plain 32-char hex UUID text.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }

        impl From<uuid::Uuid> for $T {
            fn from(u: uuid::Uuid) -> Self {
                Self(u)
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_typed_id!(ItemUuid, "ItemUuid");
impl_typed_id!(SnapshotId, "SnapshotId");

/// Fixed namespace for deriving deterministic ItemUuids via UUIDv5.
const COFFER_ITEM_NS: uuid::Uuid = uuid::uuid!("5d0f6a2e-93c4-4b71-8e2a-41c7b9d03f58");

impl ItemUuid {
    /// Derive a stable ItemUuid from a name.
    ///
    /// Same input always produces the same output. Handy for fixtures and for
    /// importers that need reproducible identities.
    pub fn from_name(name: &str) -> Self {
        Self(uuid::Uuid::new_v5(&COFFER_ITEM_NS, name.as_bytes()))
    }
}

// ============================================================================
// Tests
// ============================================================================
