//! Global configuration options.

use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::hierarchy::FilterConfiguration;

/// Global configuration options for the `zarrs_copy` crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// ## Foreign Compression
/// > default: `gzip` at level 1 with byte shuffling
///
/// The compression applied by [`copy`](crate::copy::copy) when an array is copied from the native implementation into a foreign implementation without an explicit compression.
/// Native codec configurations have no equivalent in a foreign filter pipeline, so they are not carried over.
#[derive(Debug)]
pub struct Config {
    foreign_compression: FilterConfiguration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            foreign_compression: FilterConfiguration::gzip(1),
        }
    }
}

impl Config {
    /// Get the [foreign compression](#foreign-compression) configuration.
    #[must_use]
    pub fn foreign_compression(&self) -> &FilterConfiguration {
        &self.foreign_compression
    }

    /// Set the [foreign compression](#foreign-compression) configuration.
    pub fn set_foreign_compression(&mut self, foreign_compression: FilterConfiguration) {
        self.foreign_compression = foreign_compression;
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global `zarrs_copy` configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .read()
        .unwrap()
}

/// Returns a mutable reference to the global `zarrs_copy` configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .write()
        .unwrap()
}
