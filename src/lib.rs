//! A rust library for copying data between [stores](storage) and between [hierarchies](hierarchy) of groups and arrays.
//!
//! ## Copying
//! - [`copy::copy_store`] copies raw values between stores, remapping keys from a source path to a destination path and filtering them with regular expressions.
//!   Values are never decoded, so this is the fastest way to copy between stores that share a representation.
//! - [`copy::copy`] and [`copy::copy_all`] walk a hierarchy and recreate its groups and arrays in another hierarchy, which may belong to a different [`Implementation`](hierarchy::Implementation).
//!   The compression of copied arrays is [resolved](copy::resolve_compression) from the implementations of the source and destination.
//!
//! Every copy writes one `"{source} -> {destination}"` line per copied key or node to a [`ProgressLog`](progress::ProgressLog).
//!
//! A [`LazyLoader`](lazy_loader::LazyLoader) presents the arrays of a group as a mapping that reads each array at most once.
//!
//! ## Example
//! ```rust
//! # use zarrs_copy::{copy::{copy_store, CopyStoreOptions}, progress::ProgressLog, storage::{store::MemoryStore, ReadableStorageTraits, WritableStorageTraits}};
//! let source = MemoryStore::new();
//! source.set(&"a/.zgroup".try_into()?, b"{}")?;
//! source.set(&"a/0".try_into()?, b"\x00\x01")?;
//!
//! let dest = MemoryStore::new();
//! let mut lines = Vec::new();
//! copy_store(
//!     &source,
//!     &dest,
//!     &CopyStoreOptions::new().dest_path("x"),
//!     ProgressLog::callback(|line| {
//!         lines.push(line.to_string());
//!         Ok(())
//!     }),
//! )?;
//! assert_eq!(lines, ["a/.zgroup -> x/a/.zgroup", "a/0 -> x/a/0"]);
//! assert_eq!(dest.get(&"x/a/0".try_into()?)?, Some(vec![0, 1]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Licence
//! `zarrs_copy` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
// #![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod copy;
pub mod error;
pub mod hierarchy;
pub mod lazy_loader;
pub mod node;
pub mod progress;
pub mod storage;

pub use error::CopyError;
