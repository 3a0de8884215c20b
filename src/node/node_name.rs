use derive_more::Display;
use thiserror::Error;

/// A hierarchy node name.
///
/// The root node does not have a name and is the empty string `""`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display)]
pub struct NodeName(String);

/// An invalid node name.
#[derive(Debug, Error)]
#[error("invalid node name {0}")]
pub struct NodeNameError(String);

impl NodeName {
    /// Create a new node name from `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeNameError`] if `name` is not valid according to [`NodeName::validate`()].
    pub fn new(name: &str) -> Result<Self, NodeNameError> {
        if Self::validate(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(NodeNameError(name.to_string()))
        }
    }

    pub(super) fn from_segment(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The root node.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Extracts a string slice containing the node name `String`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a node name:
    /// - it must not include the character `/`, and
    /// - it must not be a string composed only of period characters, e.g. `.` or `..`.
    ///
    /// The empty string is the name of the root node.
    #[must_use]
    pub fn validate(node_name: &str) -> bool {
        node_name.is_empty()
            || (!node_name.contains('/') && !node_name.replace('.', "").is_empty())
    }

    /// Indicates if a node has the root node name (`""`).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}
