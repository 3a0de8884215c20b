//! An in-memory hierarchy.
//!
//! A [`MemoryHierarchy`] holds a tree of groups and arrays in memory and hands out [`MemoryGroup`] and [`MemoryArray`] handles that share it.
//! It can act as either [`Implementation`], with its own default compression, which makes it useful as a scratch hierarchy and for exercising [`copy`](crate::copy::copy) between implementations.
//!
//! ### Creation semantics
//! - [`create_group`](HierarchyGroup::create_group) reopens an existing group of the same name, and fails with [`StorageError::NodeExists`] if an array occupies the name.
//! - [`create_array`](HierarchyGroup::create_array) fails with [`StorageError::NodeExists`] if any node occupies the name, unless [`ArrayCreateOptions::overwrite`] is set.
//! - New arrays are zero initialised.

use std::{collections::BTreeMap, sync::Arc};

use parking_lot::RwLock;

use crate::{node::NodePath, storage::StorageError};

use super::{
    ArrayCreateOptions, ArrayShape, Attributes, ChunkShape, CodecConfiguration, Compression,
    DataType, HierarchyArray, HierarchyGroup, Implementation, Node,
};

#[derive(Debug)]
struct HierarchyConfig {
    implementation: Implementation,
    default_compression: Compression,
}

#[derive(Debug, Default)]
struct GroupData {
    attributes: Attributes,
    children: BTreeMap<String, MemoryNode>,
}

#[derive(Debug)]
struct ArrayData {
    shape: ArrayShape,
    data_type: DataType,
    chunk_shape: ChunkShape,
    compression: Compression,
    additional: serde_json::Map<String, serde_json::Value>,
    attributes: RwLock<Attributes>,
    bytes: RwLock<Vec<u8>>,
}

#[derive(Clone, Debug)]
enum MemoryNode {
    Group(Arc<RwLock<GroupData>>),
    Array(Arc<ArrayData>),
}

/// An in-memory hierarchy.
#[derive(Clone, Debug)]
pub struct MemoryHierarchy {
    config: Arc<HierarchyConfig>,
    root: Arc<RwLock<GroupData>>,
}

impl MemoryHierarchy {
    /// Create a new, empty, hierarchy for `implementation`.
    ///
    /// The default compression is `blosc` (`lz4`, level 5, byte shuffle) for [`Implementation::Native`] and [`Compression::Uncompressed`] for [`Implementation::Foreign`].
    #[must_use]
    pub fn new(implementation: Implementation) -> Self {
        let default_compression = match implementation {
            Implementation::Native => {
                let mut configuration = serde_json::Map::new();
                configuration.insert("cname".to_string(), "lz4".into());
                configuration.insert("clevel".to_string(), 5.into());
                configuration.insert("shuffle".to_string(), 1.into());
                CodecConfiguration::new("blosc", configuration).into()
            }
            Implementation::Foreign => Compression::Uncompressed,
        };
        Self::new_with_default_compression(implementation, default_compression)
    }

    /// Create a new, empty, hierarchy for `implementation` with a custom default compression.
    #[must_use]
    pub fn new_with_default_compression(
        implementation: Implementation,
        default_compression: Compression,
    ) -> Self {
        Self {
            config: Arc::new(HierarchyConfig {
                implementation,
                default_compression,
            }),
            root: Arc::default(),
        }
    }

    /// The implementation of the hierarchy.
    #[must_use]
    pub fn implementation(&self) -> Implementation {
        self.config.implementation
    }

    /// The default compression of arrays created without an explicit compression.
    #[must_use]
    pub fn default_compression(&self) -> &Compression {
        &self.config.default_compression
    }

    /// Get a handle to the root group.
    #[must_use]
    pub fn root(&self) -> MemoryGroup {
        MemoryGroup {
            config: self.config.clone(),
            path: NodePath::root(),
            data: self.root.clone(),
        }
    }
}

/// A group in a [`MemoryHierarchy`].
#[derive(Clone, Debug)]
pub struct MemoryGroup {
    config: Arc<HierarchyConfig>,
    path: NodePath,
    data: Arc<RwLock<GroupData>>,
}

/// An array in a [`MemoryHierarchy`].
#[derive(Clone, Debug)]
pub struct MemoryArray {
    config: Arc<HierarchyConfig>,
    path: NodePath,
    data: Arc<ArrayData>,
}

impl MemoryGroup {
    /// Get the child group named `name`, if it exists.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<MemoryGroup> {
        let child = self.data.read().children.get(name).cloned();
        match child {
            Some(MemoryNode::Group(data)) => Some(MemoryGroup {
                config: self.config.clone(),
                path: self.path.child(name).ok()?,
                data,
            }),
            _ => None,
        }
    }

    /// Get the child array named `name`, if it exists.
    #[must_use]
    pub fn array(&self, name: &str) -> Option<MemoryArray> {
        let child = self.data.read().children.get(name).cloned();
        match child {
            Some(MemoryNode::Array(data)) => Some(MemoryArray {
                config: self.config.clone(),
                path: self.path.child(name).ok()?,
                data,
            }),
            _ => None,
        }
    }

    fn node(&self, name: &str, node: MemoryNode) -> Result<Node, StorageError> {
        let path = self.path.child(name)?;
        Ok(match node {
            MemoryNode::Group(data) => Node::Group(Box::new(MemoryGroup {
                config: self.config.clone(),
                path,
                data,
            })),
            MemoryNode::Array(data) => Node::Array(Box::new(MemoryArray {
                config: self.config.clone(),
                path,
                data,
            })),
        })
    }
}

impl HierarchyGroup for MemoryGroup {
    fn implementation(&self) -> Implementation {
        self.config.implementation
    }

    fn path(&self) -> &NodePath {
        &self.path
    }

    fn attributes(&self) -> Result<Attributes, StorageError> {
        Ok(self.data.read().attributes.clone())
    }

    fn update_attributes(&self, attributes: &Attributes) -> Result<(), StorageError> {
        let mut data = self.data.write();
        for (key, value) in attributes {
            data.attributes.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn children(&self) -> Result<Vec<(String, Node)>, StorageError> {
        let children: Vec<(String, MemoryNode)> = self
            .data
            .read()
            .children
            .iter()
            .map(|(name, node)| (name.clone(), node.clone()))
            .collect();
        children
            .into_iter()
            .map(|(name, node)| {
                let node = self.node(&name, node)?;
                Ok((name, node))
            })
            .collect()
    }

    fn child_names(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.data.read().children.keys().cloned().collect())
    }

    fn child(&self, name: &str) -> Result<Option<Node>, StorageError> {
        let child = self.data.read().children.get(name).cloned();
        child.map(|node| self.node(name, node)).transpose()
    }

    fn create_group(&self, name: &str) -> Result<Box<dyn HierarchyGroup>, StorageError> {
        let path = self.path.child(name)?;
        let mut data = self.data.write();
        let existing = data.children.get(name).cloned();
        let group = match existing {
            Some(MemoryNode::Group(group)) => group,
            Some(MemoryNode::Array(_)) => return Err(StorageError::NodeExists(path)),
            None => {
                let group = Arc::new(RwLock::new(GroupData::default()));
                data.children
                    .insert(name.to_string(), MemoryNode::Group(group.clone()));
                group
            }
        };
        Ok(Box::new(MemoryGroup {
            config: self.config.clone(),
            path,
            data: group,
        }))
    }

    fn create_array(
        &self,
        name: &str,
        shape: &[u64],
        data_type: DataType,
        options: &ArrayCreateOptions,
    ) -> Result<Box<dyn HierarchyArray>, StorageError> {
        let path = self.path.child(name)?;
        let chunk_shape = match options.get_chunk_shape() {
            Some(chunk_shape) if chunk_shape.len() != shape.len() => {
                return Err(StorageError::Other(format!(
                    "chunk shape {chunk_shape:?} does not match the dimensionality of array shape {shape:?}"
                )));
            }
            Some(chunk_shape) if chunk_shape.contains(&0) => {
                return Err(StorageError::Other(format!(
                    "chunk shape {chunk_shape:?} has a zero sized dimension"
                )));
            }
            Some(chunk_shape) => chunk_shape.clone(),
            None => shape.iter().map(|&s| s.max(1)).collect(),
        };
        let size = array_size(shape, data_type)?;
        let array = Arc::new(ArrayData {
            shape: shape.to_vec(),
            data_type,
            chunk_shape,
            compression: options
                .get_compression()
                .unwrap_or(&self.config.default_compression)
                .clone(),
            additional: options.get_additional().clone(),
            attributes: RwLock::default(),
            bytes: RwLock::new(vec![0; size]),
        });

        let mut data = self.data.write();
        if data.children.contains_key(name) && !options.get_overwrite() {
            return Err(StorageError::NodeExists(path));
        }
        data.children
            .insert(name.to_string(), MemoryNode::Array(array.clone()));
        Ok(Box::new(MemoryArray {
            config: self.config.clone(),
            path,
            data: array,
        }))
    }
}

impl MemoryArray {
    /// The additional implementation specific options the array was created with.
    #[must_use]
    pub fn additional_options(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.data.additional
    }
}

impl HierarchyArray for MemoryArray {
    fn implementation(&self) -> Implementation {
        self.config.implementation
    }

    fn path(&self) -> &NodePath {
        &self.path
    }

    fn shape(&self) -> ArrayShape {
        self.data.shape.clone()
    }

    fn data_type(&self) -> DataType {
        self.data.data_type
    }

    fn chunk_shape(&self) -> ChunkShape {
        self.data.chunk_shape.clone()
    }

    fn compression(&self) -> Compression {
        self.data.compression.clone()
    }

    fn attributes(&self) -> Result<Attributes, StorageError> {
        Ok(self.data.attributes.read().clone())
    }

    fn update_attributes(&self, attributes: &Attributes) -> Result<(), StorageError> {
        let mut current = self.data.attributes.write();
        for (key, value) in attributes {
            current.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn retrieve(&self) -> Result<Vec<u8>, StorageError> {
        Ok(self.data.bytes.read().clone())
    }

    fn store(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let mut current = self.data.bytes.write();
        if bytes.len() != current.len() {
            return Err(StorageError::InvalidArrayData {
                expected: current.len() as u64,
                got: bytes.len() as u64,
            });
        }
        current.copy_from_slice(bytes);
        Ok(())
    }
}

fn array_size(shape: &[u64], data_type: DataType) -> Result<usize, StorageError> {
    shape
        .iter()
        .try_fold(data_type.size() as u64, |size, &s| size.checked_mul(s))
        .and_then(|size| usize::try_from(size).ok())
        .ok_or_else(|| StorageError::Other(format!("array shape {shape:?} is too large")))
}
