//! Flat key-value storage.
//!
//! A store is a mapping from [`StoreKey`] to an opaque byte value.
//! Keys use `/` as a separator by convention only: a store has no notion of hierarchy, and distinct keys are independent.
//!
//! This module defines the synchronous store interfaces used by [`copy_store`](crate::copy::copy_store) and an in-memory [`store::MemoryStore`].
//! Directory, archive, and remote stores implement the same traits outside of this crate.

mod storage_sync;
pub mod store;
mod store_key;
mod store_prefix;

use thiserror::Error;

use crate::node::{NodeNameError, NodePath, NodePathError};

pub use store_key::{StoreKey, StoreKeyError, StoreKeys};
pub use store_prefix::{StorePrefix, StorePrefixError};

pub use self::storage_sync::{
    ListableStorageTraits, ReadableListableStorageTraits, ReadableStorageTraits,
    WritableStorageTraits,
};

/// Bytes.
pub type Bytes = Vec<u8>;

/// An alias for bytes which may or may not be available.
///
/// When a value is read from a store, it returns `MaybeBytes` which is [`None`] if the key is not available.
pub type MaybeBytes = Option<Bytes>;

/// A storage error.
///
/// This is the error type of both flat stores and [hierarchy](crate::hierarchy) handles.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A write operation was attempted on a read only store.
    #[error("a write operation was attempted on a read only store")]
    ReadOnly,
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// An invalid store prefix.
    #[error("invalid store prefix {0}")]
    StorePrefixError(#[from] StorePrefixError),
    /// An invalid store key.
    #[error("invalid store key {0}")]
    InvalidStoreKey(#[from] StoreKeyError),
    /// An invalid node path.
    #[error("invalid node path {0}")]
    NodePathError(#[from] NodePathError),
    /// An invalid node name.
    #[error("invalid node name {0}")]
    NodeNameError(#[from] NodeNameError),
    /// A node already exists where a new node was to be created.
    #[error("a node already exists at {0}")]
    NodeExists(NodePath),
    /// A node does not exist.
    #[error("node {0} does not exist")]
    NodeNotFound(NodePath),
    /// The number of bytes supplied for an array does not match its shape and data type.
    #[error("array data has {got} bytes, expected {expected}")]
    InvalidArrayData {
        /// The expected number of bytes.
        expected: u64,
        /// The number of bytes supplied.
        got: u64,
    },
    /// The requested method is not supported.
    #[error("{0}")]
    Unsupported(String),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for StorageError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for StorageError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}
