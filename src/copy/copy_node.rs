use crate::{
    config::global_config,
    error::CopyError,
    hierarchy::{
        ArrayCreateOptions, Compression, FilterConfiguration, HierarchyArray, HierarchyGroup,
        Implementation, Node,
    },
    progress::{LogWriter, ProgressLog},
};

/// Options for [`copy`] and [`copy_all`].
#[derive(Clone, Debug, Default)]
pub struct CopyOptions {
    name: Option<String>,
    shallow: bool,
    without_attributes: bool,
    create_options: ArrayCreateOptions,
}

impl CopyOptions {
    /// Create options for a deep copy with attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name to copy the source to, which defaults to the name of the source.
    ///
    /// This is ignored by [`copy_all`].
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// If true, only copy the arrays that are immediate children of the source group.
    ///
    /// Child groups are skipped entirely, they are neither created nor logged.
    #[must_use]
    pub fn shallow(mut self, shallow: bool) -> Self {
        self.shallow = shallow;
        self
    }

    /// If true, do not copy user attributes.
    #[must_use]
    pub fn without_attributes(mut self, without_attributes: bool) -> Self {
        self.without_attributes = without_attributes;
        self
    }

    /// Set the options used to create arrays, which take precedence over the options derived from source arrays.
    #[must_use]
    pub fn create_options(mut self, create_options: ArrayCreateOptions) -> Self {
        self.create_options = create_options;
        self
    }
}

/// Return the default compression of an array copied from the `source` implementation to the `destination` implementation.
///
/// | source  | destination | default compression                   |
/// |---------|-------------|---------------------------------------|
/// | native  | native      | `source_compression`                  |
/// | foreign | native      | [`None`], the destination default     |
/// | native  | foreign     | `foreign_compression`                 |
/// | foreign | foreign     | [`None`], the destination default     |
///
/// `foreign_compression` is typically the [global configuration](crate::config::Config#foreign-compression).
#[must_use]
pub fn resolve_compression(
    source: Implementation,
    destination: Implementation,
    source_compression: &Compression,
    foreign_compression: &FilterConfiguration,
) -> Option<Compression> {
    match (source, destination) {
        (Implementation::Native, Implementation::Native) => Some(source_compression.clone()),
        (Implementation::Native, Implementation::Foreign) => {
            Some(foreign_compression.clone().into())
        }
        (Implementation::Foreign, _) => None,
    }
}

/// Copy the `source` array or group into the `dest` group.
///
/// Arrays are created with the shape and data type of the source and the [creation options](CopyOptions::create_options).
/// Unset creation options default to
///  - the chunk shape of the source, and
///  - a compression that depends on the implementations of the source and destination, see [`resolve_compression`].
///
/// Array data is read in full and then written in full.
/// Copying between implementations therefore holds an entire array in memory.
///
/// Groups are created and their children are copied recursively in their natural order.
/// A [shallow](CopyOptions::shallow) copy of a group only copies the arrays directly within it, and skips its child groups.
/// Unless copying [without attributes](CopyOptions::without_attributes), source attributes are merged into the attributes of each created node, replacing any of the same name.
///
/// Every created node logs a `"{source path} -> {destination path}"` progress line.
/// Returns the node created for `source`.
///
/// # Errors
/// Returns a [`CopyError`] if
///  - no name is set and the source has no name (e.g. it is a root group),
///  - the destination refuses to create a node, such as [`CopyError::ConflictAtDestination`],
///  - the source cannot be read or the destination cannot be written, or
///  - a progress line cannot be written.
///
/// Existing nodes at the destination are not checked for before creation.
/// The destination is left partially populated if an error occurs.
pub fn copy(
    source: &Node,
    dest: &dyn HierarchyGroup,
    options: &CopyOptions,
    log: ProgressLog<'_>,
) -> Result<Node, CopyError> {
    let source_name = source.path().name();
    let name = match options.name.as_deref() {
        Some(name) => name,
        None if source_name.is_root() => {
            return Err(CopyError::InvalidName(source.path().clone()));
        }
        None => source_name.as_str(),
    };

    let mut log = LogWriter::new(log)?;
    let mut copier = NodeCopier::new(&mut log, options);
    let node = copier.copy_node(source, dest, name)?;
    tracing::info!(
        copied = copier.copied,
        source = %source.path(),
        destination = %node.path(),
        "copied node"
    );
    Ok(node)
}

/// Copy all children of the `source` group into the `dest` group.
///
/// This is equivalent to calling [`copy`] on each child of `source` in order, except that a [shallow](CopyOptions::shallow) copy skips child groups entirely.
/// [`CopyOptions::name`] is ignored.
/// Returns the created nodes in order.
///
/// # Errors
/// See [`copy`].
pub fn copy_all(
    source: &dyn HierarchyGroup,
    dest: &dyn HierarchyGroup,
    options: &CopyOptions,
    log: ProgressLog<'_>,
) -> Result<Vec<Node>, CopyError> {
    let mut log = LogWriter::new(log)?;
    let mut copier = NodeCopier::new(&mut log, options);
    let mut nodes = Vec::new();
    for (name, child) in source
        .children()
        .map_err(|err| CopyError::storage(source.path(), err))?
    {
        if let Some(node) = copier.copy_child(&child, dest, &name)? {
            nodes.push(node);
        }
    }
    tracing::info!(
        copied = copier.copied,
        source = %source.path(),
        destination = %dest.path(),
        "copied children"
    );
    Ok(nodes)
}

struct NodeCopier<'a, 'log> {
    log: &'a mut LogWriter<'log>,
    options: &'a CopyOptions,
    foreign_compression: FilterConfiguration,
    copied: usize,
}

impl<'a, 'log> NodeCopier<'a, 'log> {
    fn new(log: &'a mut LogWriter<'log>, options: &'a CopyOptions) -> Self {
        Self {
            log,
            options,
            foreign_compression: global_config().foreign_compression().clone(),
            copied: 0,
        }
    }

    fn copy_node(
        &mut self,
        source: &Node,
        dest: &dyn HierarchyGroup,
        name: &str,
    ) -> Result<Node, CopyError> {
        match source {
            Node::Array(array) => self
                .copy_array(array.as_ref(), dest, name)
                .map(Node::Array),
            Node::Group(group) => self
                .copy_group(group.as_ref(), dest, name)
                .map(Node::Group),
        }
    }

    /// Copy a node below the root of the copy, returning [`None`] if a shallow copy skips it.
    fn copy_child(
        &mut self,
        source: &Node,
        dest: &dyn HierarchyGroup,
        name: &str,
    ) -> Result<Option<Node>, CopyError> {
        if self.options.shallow && !source.is_array() {
            tracing::trace!(source = %source.path(), "shallow copy skipped group");
            return Ok(None);
        }
        self.copy_node(source, dest, name).map(Some)
    }

    fn copy_array(
        &mut self,
        source: &dyn HierarchyArray,
        dest: &dyn HierarchyGroup,
        name: &str,
    ) -> Result<Box<dyn HierarchyArray>, CopyError> {
        let mut create_options = self.options.create_options.clone();
        create_options.set_default_chunk_shape(source.chunk_shape());
        create_options.set_default_compression(resolve_compression(
            source.implementation(),
            dest.implementation(),
            &source.compression(),
            &self.foreign_compression,
        ));

        let array = dest
            .create_array(name, &source.shape(), source.data_type(), &create_options)
            .map_err(|err| CopyError::storage(source.path(), err))?;
        self.log.log_copy(source.path(), array.path())?;
        self.copied += 1;

        let bytes = source
            .retrieve()
            .map_err(|err| CopyError::storage(source.path(), err))?;
        array
            .store(&bytes)
            .map_err(|err| CopyError::storage(array.path(), err))?;
        tracing::debug!(
            source = %source.path(),
            destination = %array.path(),
            bytes = bytes.len(),
            "copied array"
        );

        if !self.options.without_attributes {
            let attributes = source
                .attributes()
                .map_err(|err| CopyError::storage(source.path(), err))?;
            array
                .update_attributes(&attributes)
                .map_err(|err| CopyError::storage(array.path(), err))?;
        }

        Ok(array)
    }

    fn copy_group(
        &mut self,
        source: &dyn HierarchyGroup,
        dest: &dyn HierarchyGroup,
        name: &str,
    ) -> Result<Box<dyn HierarchyGroup>, CopyError> {
        let group = dest
            .create_group(name)
            .map_err(|err| CopyError::storage(source.path(), err))?;
        self.log.log_copy(source.path(), group.path())?;
        self.copied += 1;
        tracing::debug!(source = %source.path(), destination = %group.path(), "copied group");

        if !self.options.without_attributes {
            let attributes = source
                .attributes()
                .map_err(|err| CopyError::storage(source.path(), err))?;
            group
                .update_attributes(&attributes)
                .map_err(|err| CopyError::storage(group.path(), err))?;
        }

        for (child_name, child) in source
            .children()
            .map_err(|err| CopyError::storage(source.path(), err))?
        {
            self.copy_child(&child, group.as_ref(), &child_name)?;
        }

        Ok(group)
    }
}
