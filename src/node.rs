//! Node paths and names.
//!
//! A node in a hierarchy is either a group or an array, identified by a [`NodePath`] such as `/foo/bar`.
//! The final segment of a path is the [`NodeName`] of the node, the root node has an empty name.

mod node_name;
mod node_path;

pub use node_name::{NodeName, NodeNameError};
pub use node_path::{normalize_storage_path, NodePath, NodePathError};
