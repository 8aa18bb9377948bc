//! Index build configuration.
//!
//! Defaults are what most callers want; a TOML fragment can override them:
//!
//! ```toml
//! duplicates = "last_write_wins"
//! max_depth = 64
//! ```

use serde::{Deserialize, Serialize};

use coffer_types::MAX_TREE_DEPTH;

use crate::Result;

/// What to do when two items of one snapshot carry the same UUID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the build with [`IndexError::DuplicateIdentity`](crate::IndexError::DuplicateIdentity).
    #[default]
    Reject,
    /// Keep the later-visited item for that UUID and log a warning.
    LastWriteWins,
}

/// Options shared by every index builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    pub duplicates: DuplicatePolicy,
    /// Deepest group nesting accepted before the build gives up.
    pub max_depth: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            max_depth: MAX_TREE_DEPTH,
        }
    }
}

impl IndexConfig {
    /// Parse a TOML fragment; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
