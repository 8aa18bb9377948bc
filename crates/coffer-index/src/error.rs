//! Error types for index construction.

use thiserror::Error;

use coffer_types::{ItemKind, ItemUuid};

/// Errors that can occur while building an index.
///
/// Lookups never produce these; a miss is `None` or the not-found id.
#[derive(Error, Debug)]
pub enum IndexError {
    /// No root group was supplied.
    #[error("cannot index a tree without a root group")]
    MissingRoot,

    /// Two items in the same snapshot share a UUID.
    ///
    /// Only raised under [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject).
    #[error("duplicate identity {uuid}: {first} and {second} share it")]
    DuplicateIdentity {
        uuid: ItemUuid,
        first: ItemKind,
        second: ItemKind,
    },

    /// The tree nests deeper than the configured limit.
    #[error("tree depth exceeds limit of {limit}")]
    DepthExceeded { limit: usize },

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for IndexError {
    fn from(e: toml::de::Error) -> Self {
        IndexError::Config(e.to_string())
    }
}
