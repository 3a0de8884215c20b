//! Stores.
//!
//! Directory and archive backed stores live outside of this crate and implement the [storage traits](crate::storage) directly.

mod memory_store;

pub use memory_store::MemoryStore;
