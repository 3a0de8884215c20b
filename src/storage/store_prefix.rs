use derive_more::{Display, From};
use thiserror::Error;

use crate::node::{normalize_storage_path, NodePathError};

/// A store prefix.
///
/// A prefix is either empty (the root) or a string ending with a single trailing `/` that does not start with `/`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct StorePrefix(String);

/// An invalid store prefix.
#[derive(Debug, Error, From)]
#[error("invalid store prefix {0}")]
pub struct StorePrefixError(String);

impl StorePrefix {
    /// Create a new store prefix from `prefix`.
    ///
    /// # Errors
    /// Returns [`StorePrefixError`] if `prefix` is not valid according to [`StorePrefix::validate`()].
    pub fn new(prefix: impl Into<String>) -> Result<Self, StorePrefixError> {
        let prefix = prefix.into();
        if Self::validate(&prefix) {
            Ok(Self(prefix))
        } else {
            Err(StorePrefixError(prefix))
        }
    }

    /// Create a store prefix from a storage path such as `"foo/bar"`, `"/foo/bar/"` or `""`.
    ///
    /// The path is normalised with [`normalize_storage_path`], then a single `/` is appended if it is non-empty.
    ///
    /// # Errors
    /// Returns [`NodePathError`] if the path contains a `.` or `..` segment.
    pub fn from_path(path: &str) -> Result<Self, NodePathError> {
        let path = normalize_storage_path(path)?;
        if path.is_empty() {
            Ok(Self::root())
        } else {
            Ok(Self(path + "/"))
        }
    }

    /// The root prefix.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Extracts a string slice containing the prefix `String`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a prefix:
    /// - the root prefix is the empty string, otherwise
    /// - a prefix ends with a trailing `/` and does not start with `/`.
    #[must_use]
    pub fn validate(prefix: &str) -> bool {
        prefix.is_empty()
            || (prefix.ends_with('/') && !prefix.starts_with('/') && !prefix.contains("//"))
    }
}

impl TryFrom<&str> for StorePrefix {
    type Error = StorePrefixError;

    fn try_from(prefix: &str) -> Result<Self, StorePrefixError> {
        Self::new(prefix)
    }
}
