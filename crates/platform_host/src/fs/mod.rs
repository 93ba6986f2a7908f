//! Virtual file system: path resolution, node model, seed tree, and the persisted tree itself.

pub mod error;
pub mod path;
pub mod seed;
pub mod types;
pub mod vfs;
