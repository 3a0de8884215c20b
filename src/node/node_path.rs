use derive_more::Display;
use thiserror::Error;

use super::NodeName;

/// A hierarchy node path.
///
/// A path always starts with `/`, and a non-root path never ends with `/` or contains an empty segment.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct NodePath(String);

/// An invalid node path.
#[derive(Debug, Error)]
#[error("invalid node path {0}")]
pub struct NodePathError(String);

impl NodePath {
    /// Create a new node path from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`NodePathError`] if `path` is not valid according to [`NodePath::validate`()].
    pub fn new(path: &str) -> Result<Self, NodePathError> {
        if Self::validate(path) {
            Ok(Self(path.to_string()))
        } else {
            Err(NodePathError(path.to_string()))
        }
    }

    /// The root node.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Extracts a string slice containing the node path `String`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a path:
    /// - a path always starts with `/`,
    /// - a non-root path cannot end with `/`, and
    /// - a path cannot contain empty segments (i.e. a `//` substring).
    #[must_use]
    pub fn validate(path: &str) -> bool {
        path.eq("/") || (path.starts_with('/') && !path.ends_with('/') && !path.contains("//"))
    }

    /// Indicates if this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.eq("/")
    }

    /// Returns the name of the node, the trailing path segment.
    ///
    /// The root node has the empty name.
    #[must_use]
    pub fn name(&self) -> NodeName {
        let name = self.0.rsplit('/').next().unwrap_or_default();
        NodeName::from_segment(name)
    }

    /// Returns the path of the child named `name`.
    ///
    /// # Errors
    /// Returns [`NodePathError`] if `name` is empty or not a valid [`NodeName`].
    pub fn child(&self, name: &str) -> Result<Self, NodePathError> {
        let path = if self.is_root() {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.0)
        };
        if name.is_empty() || !NodeName::validate(name) {
            Err(NodePathError(path))
        } else {
            Ok(Self(path))
        }
    }
}

impl TryFrom<&str> for NodePath {
    type Error = NodePathError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

/// Normalise a storage path.
///
/// Backslashes are converted to `/`, leading and trailing `/` are removed, and runs of `/` are collapsed.
/// The root path normalises to the empty string.
///
/// # Errors
/// Returns [`NodePathError`] if the path contains a `.` or `..` segment.
pub fn normalize_storage_path(path: &str) -> Result<String, NodePathError> {
    let path = path.replace('\\', "/");
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(NodePathError(path));
    }
    Ok(segments.join("/"))
}
