//! Copy errors.

use thiserror::Error;

use crate::{
    node::{NodePath, NodePathError},
    storage::StorageError,
};

/// A copy error.
///
/// Errors from the source or destination are not recovered, they are returned with the key or path being processed when the copy stopped.
/// A failed copy leaves the destination partially populated.
#[derive(Debug, Error)]
pub enum CopyError {
    /// An invalid argument, such as a regular expression that does not compile.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The source has no name and no name to copy to was provided.
    #[error("source {0} has no name, a name to copy to must be provided")]
    InvalidName(NodePath),
    /// A key or path is not present where it is required.
    #[error("{0} not found")]
    NotFound(String),
    /// The destination refused to create a node because one already exists.
    #[error("the destination already contains a node at {0}")]
    ConflictAtDestination(NodePath),
    /// A failure reading from the source or writing to the destination.
    #[error("failed to copy {context}: {source}")]
    Storage {
        /// The key or path being processed.
        context: String,
        /// The underlying error.
        #[source]
        source: StorageError,
    },
    /// A failure writing a progress line, or a progress callback returning an error.
    #[error("progress log failure: {0}")]
    Progress(#[source] std::io::Error),
}

impl CopyError {
    /// Attach the key or path being processed to a [`StorageError`].
    ///
    /// A [`StorageError::NodeExists`] becomes [`CopyError::ConflictAtDestination`].
    pub(crate) fn storage(context: impl std::fmt::Display, source: StorageError) -> Self {
        match source {
            StorageError::NodeExists(path) => Self::ConflictAtDestination(path),
            source => Self::Storage {
                context: context.to_string(),
                source,
            },
        }
    }
}

impl From<NodePathError> for CopyError {
    fn from(err: NodePathError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<regex::Error> for CopyError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
