use crate::{
    error::CopyError,
    progress::{LogWriter, ProgressLog},
    storage::{ReadableListableStorageTraits, StorePrefix, WritableStorageTraits},
};

use super::KeyFilter;

/// Options for [`copy_store`].
#[derive(Clone, Debug, Default)]
pub struct CopyStoreOptions {
    source_path: String,
    dest_path: String,
    filter: KeyFilter,
}

impl CopyStoreOptions {
    /// Create options that copy every key in the source to the same key in the destination.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only copy keys under `source_path` in the source store.
    #[must_use]
    pub fn source_path(mut self, source_path: impl Into<String>) -> Self {
        self.source_path = source_path.into();
        self
    }

    /// Copy keys to under `dest_path` in the destination store.
    #[must_use]
    pub fn dest_path(mut self, dest_path: impl Into<String>) -> Self {
        self.dest_path = dest_path.into();
        self
    }

    /// Only copy keys accepted by `filter`.
    #[must_use]
    pub fn filter(mut self, filter: KeyFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Copy values directly from the `source` store to the `dest` store.
///
/// Keys of `source` are visited in lexicographic order.
/// A key is copied if it starts with the normalised source path and is accepted by the [`KeyFilter`], which sees the full source key.
/// The source path of a copied key is replaced with the destination path, and its value is copied without modification.
///
/// This is the most efficient way to copy a group or array because chunks are not decoded and re-encoded, but the source and destination must share a storage representation.
/// Any finalisation the destination store needs (e.g. closing an archive) is up to the caller.
///
/// For example, copying `{"a/.zgroup", "a/0", "b/.zgroup"}` with a destination path of `x` logs
/// ```text
/// a/.zgroup -> x/a/.zgroup
/// a/0 -> x/a/0
/// b/.zgroup -> x/b/.zgroup
/// ```
///
/// # Errors
/// Returns a [`CopyError`] if
///  - the source or destination path contains a `.` or `..` segment,
///  - the source cannot be listed or read, or the destination cannot be written,
///  - a listed key has vanished from the source before it is read, or
///  - a progress line cannot be written.
///
/// The destination is left partially populated if an error occurs.
pub fn copy_store<TSource, TDest>(
    source: &TSource,
    dest: &TDest,
    options: &CopyStoreOptions,
    log: ProgressLog<'_>,
) -> Result<(), CopyError>
where
    TSource: ?Sized + ReadableListableStorageTraits,
    TDest: ?Sized + WritableStorageTraits,
{
    let source_prefix = StorePrefix::from_path(&options.source_path)?;
    let dest_prefix = StorePrefix::from_path(&options.dest_path)?;

    let mut log = LogWriter::new(log)?;

    let mut source_keys = source
        .list_prefix(&source_prefix)
        .map_err(|err| CopyError::storage("source keys", err))?;
    source_keys.sort();
    tracing::trace!(keys = source_keys.len(), prefix = %source_prefix, "listed source keys");

    let mut copied = 0usize;
    for source_key in source_keys {
        if !options.filter.should_copy(source_key.as_str()) {
            tracing::debug!(key = %source_key, "key excluded");
            continue;
        }
        let dest_key = source_key
            .remap(&source_prefix, &dest_prefix)
            .map_err(|err| CopyError::storage(&source_key, err.into()))?;

        log.log_copy(&source_key, &dest_key)?;
        let value = source
            .get(&source_key)
            .map_err(|err| CopyError::storage(&source_key, err))?
            .ok_or_else(|| CopyError::NotFound(source_key.to_string()))?;
        dest.set(&dest_key, &value)
            .map_err(|err| CopyError::storage(&dest_key, err))?;
        copied += 1;
    }
    tracing::info!(
        copied,
        source_path = %source_prefix,
        dest_path = %dest_prefix,
        "copied store"
    );

    Ok(())
}
