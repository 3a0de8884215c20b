//! Hierarchies of groups and arrays.
//!
//! A hierarchy is a tree of nodes.
//! A [`Node`] is either a group, which has attributes and named children, or an array (a leaf), which has attributes, a shape, a data type, a chunk shape, a compression configuration, and data.
//!
//! Hierarchies are accessed through the [`HierarchyGroup`] and [`HierarchyArray`] traits.
//! Every handle reports the [`Implementation`] it belongs to, which [`copy`](crate::copy::copy) uses to choose creation defaults when moving arrays between implementations with different codec models.
//!
//! [`memory::MemoryHierarchy`] is an in-memory hierarchy that can act as either implementation.

mod array_create_options;
mod compression;
mod data_type;
pub mod memory;

use crate::{
    node::{NodeName, NodePath},
    storage::StorageError,
};

pub use array_create_options::ArrayCreateOptions;
pub use compression::{CodecConfiguration, Compression, FilterConfiguration};
pub use data_type::DataType;

/// User attributes of a group or array.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// The shape of an array.
pub type ArrayShape = Vec<u64>;

/// The shape of a chunk.
pub type ChunkShape = Vec<u64>;

/// The implementation a hierarchy handle belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Implementation {
    /// The native implementation, with a codec based compression model.
    Native,
    /// A foreign implementation, with a filter pipeline compression model and its own defaults.
    Foreign,
}

/// A group handle.
pub trait HierarchyGroup: Send + Sync {
    /// The implementation of the group.
    fn implementation(&self) -> Implementation;

    /// The path of the group.
    fn path(&self) -> &NodePath;

    /// Returns the name of the group, which is empty for the root group.
    fn name(&self) -> NodeName {
        self.path().name()
    }

    /// Get the user attributes.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the attributes cannot be read.
    fn attributes(&self) -> Result<Attributes, StorageError>;

    /// Merge `attributes` into the user attributes, replacing existing attributes of the same name.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the attributes cannot be written.
    fn update_attributes(&self, attributes: &Attributes) -> Result<(), StorageError>;

    /// Return the children of the group in their natural order.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the children cannot be listed.
    fn children(&self) -> Result<Vec<(String, Node)>, StorageError>;

    /// Return the names of the children of the group in their natural order.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the children cannot be listed.
    fn child_names(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .children()?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    /// Return the child named `name`, or [`None`] if it does not exist.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the children cannot be listed.
    fn child(&self, name: &str) -> Result<Option<Node>, StorageError> {
        Ok(self
            .children()?
            .into_iter()
            .find_map(|(child_name, node)| (child_name == name).then_some(node)))
    }

    /// Create a group named `name` in this group.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the group cannot be created, such as [`StorageError::NodeExists`].
    fn create_group(&self, name: &str) -> Result<Box<dyn HierarchyGroup>, StorageError>;

    /// Create an array named `name` in this group.
    ///
    /// Options that are not set in `options` take the defaults of the implementation.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the array cannot be created, such as [`StorageError::NodeExists`].
    fn create_array(
        &self,
        name: &str,
        shape: &[u64],
        data_type: DataType,
        options: &ArrayCreateOptions,
    ) -> Result<Box<dyn HierarchyArray>, StorageError>;
}

/// An array handle.
pub trait HierarchyArray: Send + Sync {
    /// The implementation of the array.
    fn implementation(&self) -> Implementation;

    /// The path of the array.
    fn path(&self) -> &NodePath;

    /// Returns the name of the array.
    fn name(&self) -> NodeName {
        self.path().name()
    }

    /// The array shape.
    fn shape(&self) -> ArrayShape;

    /// The data type.
    fn data_type(&self) -> DataType;

    /// The chunk shape.
    fn chunk_shape(&self) -> ChunkShape;

    /// The compression configuration.
    fn compression(&self) -> Compression;

    /// Get the user attributes.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the attributes cannot be read.
    fn attributes(&self) -> Result<Attributes, StorageError>;

    /// Merge `attributes` into the user attributes, replacing existing attributes of the same name.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the attributes cannot be written.
    fn update_attributes(&self, attributes: &Attributes) -> Result<(), StorageError>;

    /// Read the entire array.
    ///
    /// The elements are in C order with native endianness.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the array cannot be read.
    fn retrieve(&self) -> Result<Vec<u8>, StorageError>;

    /// Write the entire array.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the array cannot be written or `bytes` does not match the shape and data type of the array.
    fn store(&self, bytes: &[u8]) -> Result<(), StorageError>;
}

/// A hierarchy node, either a group or an array.
pub enum Node {
    /// A group.
    Group(Box<dyn HierarchyGroup>),
    /// An array.
    Array(Box<dyn HierarchyArray>),
}

impl Node {
    /// The path of the node.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        match self {
            Self::Group(group) => group.path(),
            Self::Array(array) => array.path(),
        }
    }

    /// The implementation of the node.
    #[must_use]
    pub fn implementation(&self) -> Implementation {
        match self {
            Self::Group(group) => group.implementation(),
            Self::Array(array) => array.implementation(),
        }
    }

    /// Returns true if the node is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Get the user attributes of the node.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the attributes cannot be read.
    pub fn attributes(&self) -> Result<Attributes, StorageError> {
        match self {
            Self::Group(group) => group.attributes(),
            Self::Array(array) => array.attributes(),
        }
    }
}

impl core::fmt::Debug for Node {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Group(group) => write!(f, "Group({})", group.path()),
            Self::Array(array) => write!(f, "Array({})", array.path()),
        }
    }
}

/// Return a tree representation of the hierarchy below `group` as a string.
///
/// Arrays are annotated with their shape and data type.
/// For example:
/// ```text
/// /
///   a
///     baz [10000, 1000] float64
///     foo [10000, 1000] float64
///   b
/// ```
///
/// If `level` is set, nodes deeper than `level` below `group` are omitted.
/// The immediate children of `group` are at level 1, and a level of 0 shows only the path of `group`.
///
/// # Errors
/// Returns a [`StorageError`] if the children of any shown group cannot be listed.
pub fn hierarchy_tree(
    group: &dyn HierarchyGroup,
    level: Option<usize>,
) -> Result<String, StorageError> {
    fn update_tree(
        string: &mut String,
        group: &dyn HierarchyGroup,
        depth: usize,
        level: Option<usize>,
    ) -> Result<(), StorageError> {
        if level.is_some_and(|level| depth > level) {
            return Ok(());
        }
        for (name, child) in group.children()? {
            string.push_str(&" ".repeat(depth * 2));
            match child {
                Node::Array(array) => {
                    let s = format!("{name} {:?} {}", array.shape(), array.data_type());
                    string.push_str(&s);
                    string.push('\n');
                }
                Node::Group(child) => {
                    string.push_str(&name);
                    string.push('\n');
                    update_tree(string, child.as_ref(), depth + 1, level)?;
                }
            }
        }
        Ok(())
    }

    let mut string = String::default();
    string.push_str(group.path().as_str());
    string.push('\n');
    update_tree(&mut string, group, 1, level)?;
    Ok(string)
}
