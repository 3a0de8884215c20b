//! Copying stores and hierarchies.
//!
//! There are two ways to copy:
//! - [`copy_store`] copies raw values between [stores](crate::storage), remapping keys from a source prefix to a destination prefix and filtering them with a [`KeyFilter`].
//!   Values are never decoded, so this is the most efficient way to copy between stores that share a representation.
//! - [`copy`] and [`copy_all`] walk a [hierarchy](crate::hierarchy) and recreate its groups and arrays in another hierarchy, which may belong to a different [`Implementation`](crate::hierarchy::Implementation).
//!
//! All copy functions write one line per copied key or node to a [`ProgressLog`](crate::progress::ProgressLog).

mod copy_node;
mod copy_store;
mod key_filter;

pub use copy_node::{copy, copy_all, resolve_compression, CopyOptions};
pub use copy_store::{copy_store, CopyStoreOptions};
pub use key_filter::{KeyFilter, RegexFlags};
