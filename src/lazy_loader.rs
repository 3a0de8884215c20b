//! Lazily loading the arrays of a group.
//!
//! A [`LazyLoader`] presents the children of a group as a mapping from name to in-memory array.
//! An array is read from the group the first time it is requested and served from a cache afterwards.
//! Listing, counting, and membership always query the group, so nodes added to or removed from the group are visible, although arrays that were already loaded are not reloaded.

use std::{collections::HashMap, sync::Arc};

use itertools::Itertools;
use parking_lot::Mutex;

use crate::{
    error::CopyError,
    hierarchy::{ArrayShape, DataType, HierarchyGroup, Node},
};

/// An array held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedArray {
    shape: ArrayShape,
    data_type: DataType,
    bytes: Vec<u8>,
}

impl LoadedArray {
    /// The array shape.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// The data type.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The array elements as bytes, in C order with native endianness.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Return the array elements as a vector of `T`.
    ///
    /// # Errors
    /// Returns [`CopyError::InvalidArgument`] if the size of `T` does not match the size of the data type.
    pub fn elements<T: bytemuck::Pod>(&self) -> Result<Vec<T>, CopyError> {
        if std::mem::size_of::<T>() == self.data_type.size() {
            Ok(bytemuck::pod_collect_to_vec(&self.bytes))
        } else {
            Err(CopyError::InvalidArgument(format!(
                "the element type has a size of {} bytes, but the data type {} has a size of {}",
                std::mem::size_of::<T>(),
                self.data_type,
                self.data_type.size()
            )))
        }
    }
}

/// A read-through view of the arrays of a group.
pub struct LazyLoader<TGroup: ?Sized> {
    group: Arc<TGroup>,
    cache: Mutex<HashMap<String, Arc<LoadedArray>>>,
}

impl<TGroup: ?Sized + HierarchyGroup> LazyLoader<TGroup> {
    /// Create a new lazy loader for `group`.
    #[must_use]
    pub fn new(group: Arc<TGroup>) -> Self {
        Self {
            group,
            cache: Mutex::default(),
        }
    }

    /// The underlying group.
    #[must_use]
    pub fn group(&self) -> &TGroup {
        &self.group
    }

    /// Get the array named `key`, reading it from the group if it has not been read by this loader.
    ///
    /// The cache is not locked while the array is read.
    /// If two threads read the same array concurrently, the first to finish is cached and returned to both.
    ///
    /// # Errors
    /// Returns a [`CopyError`] if
    ///  - `key` is not a child of the group ([`CopyError::NotFound`]),
    ///  - `key` is a group rather than an array ([`CopyError::InvalidArgument`]), or
    ///  - the array cannot be read.
    pub fn get(&self, key: &str) -> Result<Arc<LoadedArray>, CopyError> {
        if let Some(array) = self.cache.lock().get(key) {
            return Ok(array.clone());
        }

        let loaded = Arc::new(self.load(key)?);
        let array = self
            .cache
            .lock()
            .entry(key.to_string())
            .or_insert(loaded)
            .clone();
        Ok(array)
    }

    fn load(&self, key: &str) -> Result<LoadedArray, CopyError> {
        let node = self
            .group
            .child(key)
            .map_err(|err| CopyError::storage(self.group.path(), err))?
            .ok_or_else(|| CopyError::NotFound(key.to_string()))?;
        let Node::Array(array) = node else {
            return Err(CopyError::InvalidArgument(format!(
                "{key} is a group, not an array"
            )));
        };
        let bytes = array
            .retrieve()
            .map_err(|err| CopyError::storage(array.path(), err))?;
        tracing::debug!(array = %array.path(), bytes = bytes.len(), "loaded array");

        Ok(LoadedArray {
            shape: array.shape(),
            data_type: array.data_type(),
            bytes,
        })
    }

    /// Returns true if the array named `key` has been read by this loader.
    #[must_use]
    pub fn is_loaded(&self, key: &str) -> bool {
        self.cache.lock().contains_key(key)
    }

    /// Return the number of children of the group.
    ///
    /// # Errors
    /// Returns a [`CopyError`] if the children of the group cannot be listed.
    pub fn len(&self) -> Result<usize, CopyError> {
        Ok(self.keys()?.len())
    }

    /// Returns true if the group has no children.
    ///
    /// # Errors
    /// Returns a [`CopyError`] if the children of the group cannot be listed.
    pub fn is_empty(&self) -> Result<bool, CopyError> {
        Ok(self.len()? == 0)
    }

    /// Return the names of the children of the group in their natural order.
    ///
    /// # Errors
    /// Returns a [`CopyError`] if the children of the group cannot be listed.
    pub fn keys(&self) -> Result<Vec<String>, CopyError> {
        self.group
            .child_names()
            .map_err(|err| CopyError::storage(self.group.path(), err))
    }

    /// Returns true if the group has a child named `key`.
    ///
    /// # Errors
    /// Returns a [`CopyError`] if the children of the group cannot be listed.
    pub fn contains(&self, key: &str) -> Result<bool, CopyError> {
        Ok(self.keys()?.iter().any(|name| name == key))
    }

    /// Describe the loader by the sorted names of the arrays in the group, e.g. `<LazyLoader: bar, foo>`.
    ///
    /// Child groups are not listed.
    ///
    /// # Errors
    /// Returns a [`CopyError`] if the children of the group cannot be listed.
    pub fn describe(&self) -> Result<String, CopyError> {
        let array_names = self
            .group
            .children()
            .map_err(|err| CopyError::storage(self.group.path(), err))?
            .into_iter()
            .filter_map(|(name, node)| node.is_array().then_some(name))
            .sorted()
            .join(", ");
        Ok(format!("<LazyLoader: {array_names}>"))
    }
}

impl<TGroup: ?Sized> core::fmt::Debug for LazyLoader<TGroup> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let loaded: Vec<String> = self.cache.lock().keys().cloned().sorted().collect();
        f.debug_struct("LazyLoader")
            .field("loaded", &loaded)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Barrier,
    };

    use crate::{
        hierarchy::{
            memory::{MemoryGroup, MemoryHierarchy},
            ArrayCreateOptions, Attributes, HierarchyArray, Implementation,
        },
        node::NodePath,
        storage::StorageError,
    };

    use super::*;

    /// Counts requests for individual children, optionally waiting at a barrier before each.
    struct CountingGroup {
        inner: MemoryGroup,
        child_requests: AtomicUsize,
        barrier: Option<Barrier>,
    }

    impl CountingGroup {
        fn new(inner: MemoryGroup, barrier: Option<Barrier>) -> Self {
            Self {
                inner,
                child_requests: AtomicUsize::new(0),
                barrier,
            }
        }
    }

    impl HierarchyGroup for CountingGroup {
        fn implementation(&self) -> Implementation {
            self.inner.implementation()
        }

        fn path(&self) -> &NodePath {
            self.inner.path()
        }

        fn attributes(&self) -> Result<Attributes, StorageError> {
            self.inner.attributes()
        }

        fn update_attributes(&self, attributes: &Attributes) -> Result<(), StorageError> {
            self.inner.update_attributes(attributes)
        }

        fn children(&self) -> Result<Vec<(String, Node)>, StorageError> {
            self.inner.children()
        }

        fn child(&self, name: &str) -> Result<Option<Node>, StorageError> {
            self.child_requests.fetch_add(1, Ordering::SeqCst);
            if let Some(barrier) = &self.barrier {
                barrier.wait();
            }
            self.inner.child(name)
        }

        fn create_group(&self, name: &str) -> Result<Box<dyn HierarchyGroup>, StorageError> {
            self.inner.create_group(name)
        }

        fn create_array(
            &self,
            name: &str,
            shape: &[u64],
            data_type: DataType,
            options: &ArrayCreateOptions,
        ) -> Result<Box<dyn HierarchyArray>, StorageError> {
            self.inner.create_array(name, shape, data_type, options)
        }
    }

    fn group() -> MemoryGroup {
        let hierarchy = MemoryHierarchy::new(Implementation::Native);
        let root = hierarchy.root();
        let foo = root
            .create_array("foo", &[3], DataType::Int32, &ArrayCreateOptions::new())
            .unwrap();
        foo.store(bytemuck::cast_slice(&[1i32, 2, 3])).unwrap();
        let bar = root
            .create_array("bar", &[2, 2], DataType::UInt8, &ArrayCreateOptions::new())
            .unwrap();
        bar.store(&[4, 5, 6, 7]).unwrap();
        root.create_group("sub").unwrap();
        root
    }

    #[test]
    fn lazy_loader_get() {
        let loader = LazyLoader::new(Arc::new(group()));
        let foo = loader.get("foo").unwrap();
        assert_eq!(foo.shape(), &[3]);
        assert_eq!(foo.data_type(), DataType::Int32);
        assert_eq!(foo.elements::<i32>().unwrap(), vec![1, 2, 3]);
        assert!(foo.elements::<u8>().is_err());
        let bar = loader.get("bar").unwrap();
        assert_eq!(bar.as_bytes(), &[4, 5, 6, 7]);

        assert!(matches!(loader.get("baz"), Err(CopyError::NotFound(_))));
        assert!(matches!(
            loader.get("sub"),
            Err(CopyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn lazy_loader_reads_once() {
        let loader = LazyLoader::new(Arc::new(CountingGroup::new(group(), None)));
        assert!(!loader.is_loaded("foo"));
        let first = loader.get("foo").unwrap();
        let second = loader.get("foo").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(loader.is_loaded("foo"));
        assert_eq!(loader.group().child_requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lazy_loader_concurrent_reads() {
        // both reads must be in flight at once to pass the barrier
        let loader = LazyLoader::new(Arc::new(CountingGroup::new(
            group(),
            Some(Barrier::new(2)),
        )));
        let (first, second) = std::thread::scope(|s| {
            let first = s.spawn(|| loader.get("foo").unwrap());
            let second = s.spawn(|| loader.get("foo").unwrap());
            (first.join().unwrap(), second.join().unwrap())
        });
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.elements::<i32>().unwrap(), vec![1, 2, 3]);
        assert_eq!(loader.group().child_requests.load(Ordering::SeqCst), 2);
        assert!(Arc::ptr_eq(&loader.get("foo").unwrap(), &first));
    }

    #[test]
    fn lazy_loader_mapping() {
        let group = group();
        let loader = LazyLoader::new(Arc::new(group.clone()));
        assert_eq!(loader.len().unwrap(), 3);
        assert!(!loader.is_empty().unwrap());
        assert_eq!(loader.keys().unwrap(), vec!["bar", "foo", "sub"]);
        assert!(loader.contains("sub").unwrap());
        assert!(!loader.contains("baz").unwrap());
        assert_eq!(loader.describe().unwrap(), "<LazyLoader: bar, foo>");
        assert!(!loader.is_loaded("bar"));
    }

    #[test]
    fn lazy_loader_live_structure_frozen_data() {
        let group = group();
        let loader = LazyLoader::new(Arc::new(group.clone()));
        let foo = loader.get("foo").unwrap();

        // structural changes are visible
        group
            .create_array("baz", &[1], DataType::Int8, &ArrayCreateOptions::new())
            .unwrap();
        assert_eq!(loader.len().unwrap(), 4);
        assert!(loader.contains("baz").unwrap());
        assert_eq!(loader.describe().unwrap(), "<LazyLoader: bar, baz, foo>");

        // loaded data is not
        group
            .array("foo")
            .unwrap()
            .store(bytemuck::cast_slice(&[7i32, 8, 9]))
            .unwrap();
        assert_eq!(loader.get("foo").unwrap(), foo);
        assert_eq!(loader.get("foo").unwrap().elements::<i32>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn lazy_loader_empty() {
        let hierarchy = MemoryHierarchy::new(Implementation::Foreign);
        let loader = LazyLoader::new(Arc::new(hierarchy.root()));
        assert!(loader.is_empty().unwrap());
        assert_eq!(loader.describe().unwrap(), "<LazyLoader: >");
    }
}
