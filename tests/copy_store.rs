use zarrs_copy::{
    copy::{copy_store, CopyStoreOptions, KeyFilter, RegexFlags},
    progress::ProgressLog,
    storage::{
        store::MemoryStore, ListableStorageTraits, MaybeBytes, ReadableStorageTraits,
        StorageError, StoreKey, StoreKeys, StorePrefix, WritableStorageTraits,
    },
    CopyError,
};

/// A store that fails to write one key.
struct FailingStore {
    inner: MemoryStore,
    fail_on: StoreKey,
}

impl WritableStorageTraits for FailingStore {
    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StorageError> {
        if key == &self.fail_on {
            Err(StorageError::Other("disk full".to_string()))
        } else {
            self.inner.set(key, value)
        }
    }
}

/// A store that lists a key it cannot read.
struct VanishingStore {
    inner: MemoryStore,
    vanished: StoreKey,
}

impl ReadableStorageTraits for VanishingStore {
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        self.inner.get(key)
    }
}

impl ListableStorageTraits for VanishingStore {
    fn list(&self) -> Result<StoreKeys, StorageError> {
        let mut keys = self.inner.list()?;
        keys.push(self.vanished.clone());
        Ok(keys)
    }
}

/// A store that can only be listed below a prefix.
struct PrefixOnlyStore {
    inner: MemoryStore,
}

impl ReadableStorageTraits for PrefixOnlyStore {
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        self.inner.get(key)
    }
}

impl ListableStorageTraits for PrefixOnlyStore {
    fn list(&self) -> Result<StoreKeys, StorageError> {
        Err(StorageError::Unsupported("listing the whole store".to_string()))
    }

    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        if prefix.as_str().is_empty() {
            self.list()
        } else {
            self.inner.list_prefix(prefix)
        }
    }
}

fn source_store() -> Result<MemoryStore, Box<dyn std::error::Error>> {
    let store = MemoryStore::new();
    store.set(&"b/.zgroup".try_into()?, br#"{"zarr_format":2}"#)?;
    store.set(&"a/.zgroup".try_into()?, br#"{"zarr_format":2}"#)?;
    store.set(&"a/.zattrs".try_into()?, br#"{"foo":"bar"}"#)?;
    store.set(&"a/x/.zarray".try_into()?, b"{}")?;
    store.set(&"a/x/0.0".try_into()?, &[1, 2, 3])?;
    store.set(&"a/x/0.1".try_into()?, &[4, 5, 6])?;
    Ok(store)
}

#[test]
fn copy_store_all_keys_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let source = source_store()?;
    let dest = MemoryStore::new();
    let mut log = Vec::new();
    copy_store(
        &source,
        &dest,
        &CopyStoreOptions::new(),
        ProgressLog::writer(&mut log),
    )?;
    assert_eq!(dest.list()?, source.list()?);
    for key in source.list()? {
        assert_eq!(dest.get(&key)?, source.get(&key)?);
    }
    assert_eq!(
        String::from_utf8(log)?,
        "a/.zattrs -> a/.zattrs
a/.zgroup -> a/.zgroup
a/x/.zarray -> a/x/.zarray
a/x/0.0 -> a/x/0.0
a/x/0.1 -> a/x/0.1
b/.zgroup -> b/.zgroup
"
    );
    Ok(())
}

#[test]
fn copy_store_subtree_without_attributes() -> Result<(), Box<dyn std::error::Error>> {
    let source = source_store()?;
    let dest = MemoryStore::new();
    let filter = KeyFilter::new([r"\.zattrs$"], [] as [&str; 0], RegexFlags::default())?;
    copy_store(
        &source,
        &dest,
        &CopyStoreOptions::new()
            .source_path("a")
            .dest_path("/copies/a_copy/")
            .filter(filter),
        ProgressLog::None,
    )?;
    assert_eq!(
        dest.list()?,
        vec![
            StoreKey::new("copies/a_copy/.zgroup")?,
            StoreKey::new("copies/a_copy/x/.zarray")?,
            StoreKey::new("copies/a_copy/x/0.0")?,
            StoreKey::new("copies/a_copy/x/0.1")?,
        ]
    );
    assert_eq!(
        dest.get(&"copies/a_copy/x/0.1".try_into()?)?,
        Some(vec![4, 5, 6])
    );
    Ok(())
}

#[test]
fn copy_store_lists_only_source_path() -> Result<(), Box<dyn std::error::Error>> {
    let source = PrefixOnlyStore {
        inner: source_store()?,
    };
    let dest = MemoryStore::new();
    let mut lines = Vec::new();
    copy_store(
        &source,
        &dest,
        &CopyStoreOptions::new().source_path("a/x").dest_path("y"),
        ProgressLog::callback(|line| {
            lines.push(line.to_string());
            Ok(())
        }),
    )?;
    assert_eq!(
        lines,
        vec!["a/x/.zarray -> y/.zarray", "a/x/0.0 -> y/0.0", "a/x/0.1 -> y/0.1"]
    );
    assert_eq!(dest.len(), 3);

    // the whole store is listed for an empty source path
    let result = copy_store(&source, &dest, &CopyStoreOptions::new(), ProgressLog::None);
    assert!(matches!(
        result,
        Err(CopyError::Storage {
            source: StorageError::Unsupported(_),
            ..
        })
    ));
    Ok(())
}

#[test]
fn copy_store_include_overrides_exclude() -> Result<(), Box<dyn std::error::Error>> {
    let source = source_store()?;
    let dest = MemoryStore::new();
    let filter = KeyFilter::new(["^a/"], [r"\.zarray$", "0.1"], RegexFlags::default())?;
    copy_store(
        &source,
        &dest,
        &CopyStoreOptions::new().filter(filter),
        ProgressLog::None,
    )?;
    assert_eq!(
        dest.list()?,
        vec![
            StoreKey::new("a/x/.zarray")?,
            StoreKey::new("a/x/0.1")?,
            StoreKey::new("b/.zgroup")?,
        ]
    );
    Ok(())
}

#[test]
fn copy_store_empty_source() -> Result<(), Box<dyn std::error::Error>> {
    let source = MemoryStore::new();
    let dest = MemoryStore::new();
    let mut lines = 0;
    copy_store(
        &source,
        &dest,
        &CopyStoreOptions::new().dest_path("x"),
        ProgressLog::callback(|_| {
            lines += 1;
            Ok(())
        }),
    )?;
    assert_eq!(lines, 0);
    assert!(dest.is_empty());
    Ok(())
}

#[test]
fn copy_store_write_failure_releases_log() -> Result<(), Box<dyn std::error::Error>> {
    let source = source_store()?;
    let dest = FailingStore {
        inner: MemoryStore::new(),
        fail_on: "a/x/0.0".try_into()?,
    };
    let dir = tempfile::tempdir()?;
    let log_path = dir.path().join("copy.log");

    let result = copy_store(
        &source,
        &dest,
        &CopyStoreOptions::new(),
        ProgressLog::path(&log_path),
    );
    match result {
        Err(CopyError::Storage { context, source: err }) => {
            assert_eq!(context, "a/x/0.0");
            assert!(matches!(err, StorageError::Other(_)));
        }
        other => panic!("expected a storage error, got {other:?}"),
    }

    // keys before the failure were copied, and logged lines were flushed and the file closed
    assert_eq!(dest.inner.len(), 3);
    assert!(dest.inner.get(&"b/.zgroup".try_into()?)?.is_none());
    assert_eq!(
        std::fs::read_to_string(&log_path)?,
        "a/.zattrs -> a/.zattrs
a/.zgroup -> a/.zgroup
a/x/.zarray -> a/x/.zarray
a/x/0.0 -> a/x/0.0
"
    );
    std::fs::remove_file(&log_path)?;
    Ok(())
}

#[test]
fn copy_store_vanished_key() -> Result<(), Box<dyn std::error::Error>> {
    let source = VanishingStore {
        inner: source_store()?,
        vanished: "a/x/0.2".try_into()?,
    };
    let dest = MemoryStore::new();
    let result = copy_store(&source, &dest, &CopyStoreOptions::new(), ProgressLog::None);
    assert!(matches!(result, Err(CopyError::NotFound(key)) if key == "a/x/0.2"));
    Ok(())
}

#[test]
fn copy_store_callback_error_aborts() -> Result<(), Box<dyn std::error::Error>> {
    let source = source_store()?;
    let dest = MemoryStore::new();
    let mut calls = 0;
    let result = copy_store(
        &source,
        &dest,
        &CopyStoreOptions::new(),
        ProgressLog::callback(|_| {
            calls += 1;
            if calls == 2 {
                Err(std::io::Error::other("cancelled"))
            } else {
                Ok(())
            }
        }),
    );
    assert!(matches!(result, Err(CopyError::Progress(_))));
    assert_eq!(dest.len(), 1);
    Ok(())
}
