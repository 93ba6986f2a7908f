//! Virtual file system error taxonomy.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Typed failures returned by [`crate::VirtualFileSystem`] operations.
///
/// Every variant carries the resolved path the operation was working on so callers can render a
/// user-facing message without extra bookkeeping.
pub enum VfsError {
    /// No node exists at the path.
    #[error("no such file or directory: {path}")]
    NotFound {
        /// Resolved path.
        path: String,
    },
    /// A directory was required but a file was found.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// Resolved path.
        path: String,
    },
    /// A file was required but a directory was found.
    #[error("not a file: {path}")]
    NotAFile {
        /// Resolved path.
        path: String,
    },
    /// The target name is already taken in its parent directory.
    #[error("path already exists: {path}")]
    AlreadyExists {
        /// Resolved path.
        path: String,
    },
    /// A non-empty directory was removed without the recursive flag.
    #[error("directory not empty: {path} (use recursive removal)")]
    DirectoryNotEmpty {
        /// Resolved path.
        path: String,
    },
    /// The parent of the target does not resolve to a directory.
    #[error("parent directory not found: {path}")]
    NoParent {
        /// Resolved parent path.
        path: String,
    },
    /// The operation would remove or move the root directory.
    #[error("operation not permitted on the root directory")]
    RootProtected,
    /// A directory was moved inside its own subtree.
    #[error("cannot move {source_path} into itself ({dest})")]
    MoveIntoSelf {
        /// Resolved source path.
        source_path: String,
        /// Resolved destination path.
        dest: String,
    },
}
