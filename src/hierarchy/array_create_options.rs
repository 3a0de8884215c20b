use super::{ChunkShape, Compression};

/// Options for creating an array in a [`HierarchyGroup`](super::HierarchyGroup).
///
/// Unset options take the defaults of the implementation creating the array.
/// When copying, unset options are filled from the source array as described in [`copy`](crate::copy::copy).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrayCreateOptions {
    chunk_shape: Option<ChunkShape>,
    compression: Option<Compression>,
    overwrite: bool,
    additional: serde_json::Map<String, serde_json::Value>,
}

impl ArrayCreateOptions {
    /// Create a new set of array creation options with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk shape.
    #[must_use]
    pub fn chunk_shape(mut self, chunk_shape: ChunkShape) -> Self {
        self.chunk_shape = Some(chunk_shape);
        self
    }

    /// Set the compression.
    #[must_use]
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Set whether an existing node at the destination may be replaced.
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set an additional implementation specific option, passed to the implementation verbatim.
    #[must_use]
    pub fn additional(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.additional.insert(name.into(), value);
        self
    }

    /// Get the chunk shape, if set.
    #[must_use]
    pub fn get_chunk_shape(&self) -> Option<&ChunkShape> {
        self.chunk_shape.as_ref()
    }

    /// Get the compression, if set.
    #[must_use]
    pub fn get_compression(&self) -> Option<&Compression> {
        self.compression.as_ref()
    }

    /// Get the overwrite flag.
    #[must_use]
    pub const fn get_overwrite(&self) -> bool {
        self.overwrite
    }

    /// Get the additional implementation specific options.
    #[must_use]
    pub fn get_additional(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.additional
    }

    /// Set the chunk shape if it is not already set.
    pub fn set_default_chunk_shape(&mut self, chunk_shape: ChunkShape) {
        self.chunk_shape.get_or_insert(chunk_shape);
    }

    /// Set the compression if it is not already set.
    pub fn set_default_compression(&mut self, compression: Option<Compression>) {
        if self.compression.is_none() {
            self.compression = compression;
        }
    }
}
