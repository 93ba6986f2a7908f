//! Typed host-domain contracts shared by the desktop runtime, its apps, and browser adapters.
//!
//! This crate owns the virtual file system and the storage/time seams it depends on. Concrete
//! browser adapters live in `platform_host_web`; everything here also runs natively so the
//! runtime can be exercised headlessly in tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod fs;
pub mod storage;
pub mod time;

pub use fs::error::VfsError;
pub use fs::path::{normalize_virtual_path, resolve_virtual_path, split_parent};
pub use fs::seed::seed_tree;
pub use fs::types::{
    PersistedTree, SaveStatus, VfsEntry, VfsEntryKind, VfsMetadata, VfsNode, VFS_STORAGE_KEY,
};
pub use fs::vfs::VirtualFileSystem;
pub use storage::kv::{
    load_typed_with, save_typed_with, KeyValueStore, MemoryKeyValueStore, StorageError,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now, Clock, ManualClock, SystemClock};
