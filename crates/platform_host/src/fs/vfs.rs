//! Persisted in-memory virtual file system.

use std::{fmt, rc::Rc};

use serde::Serialize;

use super::{
    error::VfsError,
    path::{path_segments, resolve_virtual_path, split_parent},
    seed::seed_tree,
    types::{PersistedTree, SaveStatus, VfsEntry, VfsMetadata, VfsNode, VFS_STORAGE_KEY},
};
use crate::{
    storage::kv::{
        load_typed_with, save_typed_with, KeyValueStore, MemoryKeyValueStore, StorageError,
    },
    time::{Clock, SystemClock},
};

#[derive(Serialize)]
struct PersistedTreeRef<'a> {
    #[serde(rename = "/")]
    root: &'a VfsNode,
}

/// Rooted tree of files and directories persisted as a single JSON blob.
///
/// Paths passed to every operation are resolved against `/`; callers that track a working
/// directory resolve first with [`VirtualFileSystem::resolve`]. Every successful mutation writes
/// the whole tree back to the [`KeyValueStore`] before returning. A failed write keeps the
/// in-memory change and is reported as [`SaveStatus::InMemoryOnly`].
pub struct VirtualFileSystem {
    root: VfsNode,
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    storage_key: String,
    save_status: SaveStatus,
}

impl fmt::Debug for VirtualFileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualFileSystem")
            .field("storage_key", &self.storage_key)
            .field("save_status", &self.save_status)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl VirtualFileSystem {
    /// Loads the tree stored under [`VFS_STORAGE_KEY`].
    ///
    /// Missing, unreadable, or corrupt data falls back to the seed tree; loading never fails.
    pub fn load(store: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self::load_with_key(store, clock, VFS_STORAGE_KEY)
    }

    /// Loads the tree stored under a custom key.
    pub fn load_with_key(
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let root = match load_typed_with::<_, PersistedTree>(store.as_ref(), &storage_key) {
            Ok(Some(tree)) if tree.root.is_dir() => tree.root,
            Ok(Some(_)) => {
                tracing::warn!(key = %storage_key, "persisted file system root is not a directory; using seed tree");
                seed_tree(clock.now_ms())
            }
            Ok(None) => seed_tree(clock.now_ms()),
            Err(err @ StorageError::Serialize(_)) => {
                tracing::warn!(key = %storage_key, "persisted file system is corrupt ({err}); using seed tree");
                seed_tree(clock.now_ms())
            }
            Err(err) => {
                tracing::warn!(key = %storage_key, "file system load failed ({err}); using seed tree");
                seed_tree(clock.now_ms())
            }
        };

        Self {
            root,
            store,
            clock,
            storage_key,
            save_status: SaveStatus::Saved,
        }
    }

    /// Creates a seeded file system backed by a private in-memory store.
    pub fn in_memory() -> Self {
        Self::load(
            Rc::new(MemoryKeyValueStore::default()),
            Rc::new(SystemClock),
        )
    }

    /// Resolves `path` against the working directory `cwd`.
    pub fn resolve(path: &str, cwd: &str) -> String {
        resolve_virtual_path(path, cwd)
    }

    /// Outcome of the most recent persistence attempt.
    pub fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    /// Root directory node.
    pub fn root(&self) -> &VfsNode {
        &self.root
    }

    /// Lists a directory in insertion order.
    ///
    /// # Errors
    ///
    /// [`VfsError::NotFound`] when nothing exists at `path`, [`VfsError::NotADirectory`] when it
    /// is a file.
    pub fn list_dir(&self, path: &str) -> Result<Vec<VfsEntry>, VfsError> {
        let resolved = resolve_virtual_path(path, "/");
        let node = self
            .node(&resolved)
            .ok_or_else(|| VfsError::NotFound {
                path: resolved.clone(),
            })?;
        let children = node
            .children()
            .ok_or(VfsError::NotADirectory { path: resolved })?;

        Ok(children
            .iter()
            .map(|(name, child)| VfsEntry {
                name: name.clone(),
                kind: child.kind(),
                size: child.size(),
                modified_at_unix_ms: child.modified(),
                executable: child.is_executable(),
            })
            .collect())
    }

    /// Reads a file's contents.
    ///
    /// # Errors
    ///
    /// [`VfsError::NotFound`] or [`VfsError::NotAFile`].
    pub fn read_file(&self, path: &str) -> Result<String, VfsError> {
        let resolved = resolve_virtual_path(path, "/");
        match self.node(&resolved) {
            Some(VfsNode::File { content, .. }) => Ok(content.clone()),
            Some(VfsNode::Directory { .. }) => Err(VfsError::NotAFile { path: resolved }),
            None => Err(VfsError::NotFound { path: resolved }),
        }
    }

    /// Creates or overwrites a file. Missing parent directories are not created.
    ///
    /// # Errors
    ///
    /// [`VfsError::NoParent`] when the parent is not a directory, [`VfsError::NotAFile`] when the
    /// target is a directory.
    pub fn write_file(&mut self, path: &str, content: &str) -> Result<SaveStatus, VfsError> {
        let resolved = resolve_virtual_path(path, "/");
        let Some((parent, name)) = split_parent(&resolved) else {
            return Err(VfsError::NotAFile { path: resolved });
        };
        let now = self.clock.now_ms();

        let Some(VfsNode::Directory {
            children, modified, ..
        }) = self.node_mut(&parent)
        else {
            return Err(VfsError::NoParent { path: parent });
        };

        match children.get_mut(&name) {
            Some(VfsNode::File {
                content: existing,
                modified: file_modified,
                ..
            }) => {
                *existing = content.to_string();
                *file_modified = (*file_modified).max(now);
            }
            Some(VfsNode::Directory { .. }) => {
                return Err(VfsError::NotAFile { path: resolved });
            }
            None => {
                children.insert(name, VfsNode::file(content, now));
            }
        }
        *modified = (*modified).max(now);

        Ok(self.persist())
    }

    /// Creates an empty directory.
    ///
    /// # Errors
    ///
    /// [`VfsError::AlreadyExists`] when the name is taken, [`VfsError::NoParent`] when the
    /// parent is missing or a file.
    pub fn mkdir(&mut self, path: &str) -> Result<SaveStatus, VfsError> {
        let resolved = resolve_virtual_path(path, "/");
        let Some((parent, name)) = split_parent(&resolved) else {
            return Err(VfsError::AlreadyExists { path: resolved });
        };
        let now = self.clock.now_ms();

        let Some(VfsNode::Directory {
            children, modified, ..
        }) = self.node_mut(&parent)
        else {
            return Err(VfsError::NoParent { path: parent });
        };
        if children.contains_key(&name) {
            return Err(VfsError::AlreadyExists { path: resolved });
        }
        children.insert(name, VfsNode::empty_dir(now));
        *modified = (*modified).max(now);

        Ok(self.persist())
    }

    /// Removes a file or directory.
    ///
    /// # Errors
    ///
    /// [`VfsError::RootProtected`] for `/`, [`VfsError::NotFound`] when missing,
    /// [`VfsError::DirectoryNotEmpty`] for a non-empty directory without `recursive`.
    pub fn remove(&mut self, path: &str, recursive: bool) -> Result<SaveStatus, VfsError> {
        let resolved = resolve_virtual_path(path, "/");
        let Some((parent, name)) = split_parent(&resolved) else {
            return Err(VfsError::RootProtected);
        };
        let now = self.clock.now_ms();

        let Some(VfsNode::Directory {
            children, modified, ..
        }) = self.node_mut(&parent)
        else {
            return Err(VfsError::NotFound { path: resolved });
        };
        let Some(target) = children.get(&name) else {
            return Err(VfsError::NotFound { path: resolved });
        };
        let non_empty = target.children().is_some_and(|c| !c.is_empty());
        if non_empty && !recursive {
            return Err(VfsError::DirectoryNotEmpty { path: resolved });
        }
        children.shift_remove(&name);
        *modified = (*modified).max(now);

        Ok(self.persist())
    }

    /// Returns whether anything exists at `path`.
    pub fn exists(&self, path: &str) -> bool {
        self.node(&resolve_virtual_path(path, "/")).is_some()
    }

    /// Returns metadata for `path`.
    ///
    /// # Errors
    ///
    /// [`VfsError::NotFound`] when nothing exists at `path`.
    pub fn stat(&self, path: &str) -> Result<VfsMetadata, VfsError> {
        let resolved = resolve_virtual_path(path, "/");
        self.node(&resolved)
            .map(VfsNode::metadata)
            .ok_or(VfsError::NotFound { path: resolved })
    }

    /// Moves a node to a new path. Never overwrites; node timestamps are preserved.
    ///
    /// # Errors
    ///
    /// [`VfsError::NotFound`] for a missing source, [`VfsError::NoParent`] for a missing
    /// destination parent, [`VfsError::AlreadyExists`] when the destination is taken,
    /// [`VfsError::RootProtected`] when moving `/`, [`VfsError::MoveIntoSelf`] when the
    /// destination lies inside the source.
    pub fn rename(&mut self, old_path: &str, new_path: &str) -> Result<SaveStatus, VfsError> {
        let source = resolve_virtual_path(old_path, "/");
        let dest = resolve_virtual_path(new_path, "/");
        let Some((source_parent, source_name)) = split_parent(&source) else {
            return Err(VfsError::RootProtected);
        };
        if self.node(&source).is_none() {
            return Err(VfsError::NotFound { path: source });
        }
        let (dest_parent, dest_name) = self.check_destination(&dest)?;
        if dest.starts_with(&format!("{source}/")) {
            return Err(VfsError::MoveIntoSelf {
                source_path: source,
                dest,
            });
        }
        let now = self.clock.now_ms();

        let node = match self.node_mut(&source_parent) {
            Some(VfsNode::Directory {
                children, modified, ..
            }) => {
                let Some(node) = children.shift_remove(&source_name) else {
                    return Err(VfsError::NotFound { path: source });
                };
                *modified = (*modified).max(now);
                node
            }
            _ => return Err(VfsError::NotFound { path: source }),
        };
        self.insert_child(&dest_parent, dest_name, node, now)?;

        Ok(self.persist())
    }

    /// Deep-copies a node to a new path.
    ///
    /// The copy root gets fresh `created`/`modified` stamps; nested nodes keep the source
    /// timestamps.
    ///
    /// # Errors
    ///
    /// Same destination preconditions as [`VirtualFileSystem::rename`].
    pub fn copy(&mut self, source_path: &str, dest_path: &str) -> Result<SaveStatus, VfsError> {
        let source = resolve_virtual_path(source_path, "/");
        let dest = resolve_virtual_path(dest_path, "/");
        let Some(mut copied) = self.node(&source).cloned() else {
            return Err(VfsError::NotFound { path: source });
        };
        let (dest_parent, dest_name) = self.check_destination(&dest)?;
        let now = self.clock.now_ms();
        copied.restamp(now);
        self.insert_child(&dest_parent, dest_name, copied, now)?;

        Ok(self.persist())
    }

    /// Sets or clears the executable flag on a file.
    ///
    /// # Errors
    ///
    /// [`VfsError::NotFound`] when missing, [`VfsError::NotAFile`] for directories.
    pub fn chmod(&mut self, path: &str, executable: bool) -> Result<SaveStatus, VfsError> {
        let resolved = resolve_virtual_path(path, "/");
        let now = self.clock.now_ms();
        match self.node_mut(&resolved) {
            Some(VfsNode::File {
                executable: flag,
                modified,
                ..
            }) => {
                *flag = executable;
                *modified = (*modified).max(now);
            }
            Some(VfsNode::Directory { .. }) => {
                return Err(VfsError::NotAFile { path: resolved });
            }
            None => return Err(VfsError::NotFound { path: resolved }),
        }

        Ok(self.persist())
    }

    /// Replaces the whole tree with a fresh seed tree and persists it.
    pub fn reset(&mut self) -> SaveStatus {
        self.root = seed_tree(self.clock.now_ms());
        tracing::info!(key = %self.storage_key, "virtual file system reset to seed tree");
        self.persist()
    }

    fn node(&self, resolved: &str) -> Option<&VfsNode> {
        let mut current = &self.root;
        for segment in path_segments(resolved) {
            current = current.children()?.get(segment)?;
        }
        Some(current)
    }

    fn node_mut(&mut self, resolved: &str) -> Option<&mut VfsNode> {
        let mut current = &mut self.root;
        for segment in path_segments(resolved) {
            current = current.children_mut()?.get_mut(segment)?;
        }
        Some(current)
    }

    fn check_destination(&self, dest: &str) -> Result<(String, String), VfsError> {
        let Some((parent, name)) = split_parent(dest) else {
            return Err(VfsError::AlreadyExists {
                path: dest.to_string(),
            });
        };
        match self.node(&parent).and_then(VfsNode::children) {
            None => Err(VfsError::NoParent { path: parent }),
            Some(children) if children.contains_key(&name) => Err(VfsError::AlreadyExists {
                path: dest.to_string(),
            }),
            Some(_) => Ok((parent, name)),
        }
    }

    fn insert_child(
        &mut self,
        parent: &str,
        name: String,
        node: VfsNode,
        now: u64,
    ) -> Result<(), VfsError> {
        let Some(VfsNode::Directory {
            children, modified, ..
        }) = self.node_mut(parent)
        else {
            return Err(VfsError::NoParent {
                path: parent.to_string(),
            });
        };
        children.insert(name, node);
        *modified = (*modified).max(now);
        Ok(())
    }

    fn persist(&mut self) -> SaveStatus {
        let tree = PersistedTreeRef { root: &self.root };
        self.save_status = match save_typed_with(self.store.as_ref(), &self.storage_key, &tree) {
            Ok(()) => SaveStatus::Saved,
            Err(err) => {
                tracing::warn!(key = %self.storage_key, "file system change kept in memory only: {err}");
                SaveStatus::InMemoryOnly
            }
        };
        self.save_status
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{fs::types::VfsEntryKind, time::ManualClock};

    fn fixture() -> (VirtualFileSystem, MemoryKeyValueStore, ManualClock) {
        let store = MemoryKeyValueStore::default();
        let clock = ManualClock::new(1_000);
        let vfs = VirtualFileSystem::load(Rc::new(store.clone()), Rc::new(clock.clone()));
        (vfs, store, clock)
    }

    #[test]
    fn seed_tree_is_listed_in_insertion_order() {
        let (vfs, _, _) = fixture();
        let names: Vec<_> = vfs
            .list_dir("/")
            .expect("list root")
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["home", "bin", "tmp"]);

        let bin = vfs.list_dir("/bin").expect("list bin");
        assert_eq!(bin[0].name, "hello");
        assert!(bin[0].executable);
        assert_eq!(bin[0].kind, VfsEntryKind::File);
    }

    #[test]
    fn write_then_read_round_trips_and_persists() {
        let (mut vfs, store, _) = fixture();
        let status = vfs.write_file("/tmp/a.txt", "hello").expect("write");
        assert_eq!(status, SaveStatus::Saved);
        assert_eq!(vfs.read_file("/tmp/a.txt").expect("read"), "hello");

        let raw = store.raw(VFS_STORAGE_KEY).expect("persisted");
        let tree: PersistedTree = serde_json::from_str(&raw).expect("valid blob");
        let tmp = tree.root.children().expect("root")["tmp"].clone();
        assert!(tmp.children().expect("tmp dir").contains_key("a.txt"));
    }

    #[test]
    fn overwrite_bumps_modified_but_keeps_created() {
        let (mut vfs, _, clock) = fixture();
        let _ = vfs.write_file("/tmp/a", "1").expect("write");
        clock.advance(500);
        let _ = vfs.write_file("/tmp/a", "2").expect("overwrite");

        let meta = vfs.stat("/tmp/a").expect("stat");
        assert_eq!(meta.created_at_unix_ms, 1_000);
        assert_eq!(meta.modified_at_unix_ms, 1_500);
        assert_eq!(meta.size, Some(1));
        assert_eq!(vfs.stat("/tmp").expect("stat").modified_at_unix_ms, 1_500);
    }

    #[test]
    fn modified_never_decreases_when_clock_goes_backwards() {
        let (mut vfs, _, clock) = fixture();
        clock.set(5_000);
        let _ = vfs.write_file("/tmp/a", "1").expect("write");
        clock.set(10);
        let _ = vfs.write_file("/tmp/a", "2").expect("write");
        assert_eq!(vfs.stat("/tmp/a").expect("stat").modified_at_unix_ms, 5_000);
    }

    #[test]
    fn write_requires_existing_parent_directory() {
        let (mut vfs, _, _) = fixture();
        assert_eq!(
            vfs.write_file("/missing/a.txt", "x"),
            Err(VfsError::NoParent {
                path: "/missing".to_string()
            })
        );
        assert_eq!(
            vfs.write_file("/bin/hello/x", "x"),
            Err(VfsError::NoParent {
                path: "/bin/hello".to_string()
            })
        );
        assert_eq!(
            vfs.write_file("/tmp", "x"),
            Err(VfsError::NotAFile {
                path: "/tmp".to_string()
            })
        );
        assert!(matches!(
            vfs.write_file("/", "x"),
            Err(VfsError::NotAFile { .. })
        ));
    }

    #[test]
    fn list_and_read_report_kind_mismatches() {
        let (vfs, _, _) = fixture();
        assert!(matches!(
            vfs.list_dir("/bin/hello"),
            Err(VfsError::NotADirectory { .. })
        ));
        assert!(matches!(vfs.list_dir("/nope"), Err(VfsError::NotFound { .. })));
        assert!(matches!(vfs.read_file("/bin"), Err(VfsError::NotAFile { .. })));
        assert!(matches!(vfs.read_file("/nope"), Err(VfsError::NotFound { .. })));
    }

    #[test]
    fn mkdir_rejects_existing_names_and_missing_parents() {
        let (mut vfs, _, _) = fixture();
        let _ = vfs.mkdir("/tmp/d").expect("mkdir");
        assert!(vfs.exists("/tmp/d"));
        assert_eq!(
            vfs.mkdir("/tmp/d"),
            Err(VfsError::AlreadyExists {
                path: "/tmp/d".to_string()
            })
        );
        assert!(matches!(vfs.mkdir("/"), Err(VfsError::AlreadyExists { .. })));
        assert!(matches!(vfs.mkdir("/a/b"), Err(VfsError::NoParent { .. })));
    }

    #[test]
    fn remove_guards_non_empty_directories_and_root() {
        let (mut vfs, _, _) = fixture();
        let _ = vfs.mkdir("/d").expect("mkdir");
        let _ = vfs.write_file("/d/f", "x").expect("write");

        assert_eq!(
            vfs.remove("/d", false),
            Err(VfsError::DirectoryNotEmpty {
                path: "/d".to_string()
            })
        );
        let _ = vfs.remove("/d", true).expect("recursive remove");
        assert!(!vfs.exists("/d"));

        assert_eq!(vfs.remove("/", true), Err(VfsError::RootProtected));
        assert!(matches!(vfs.remove("/nope", false), Err(VfsError::NotFound { .. })));

        let _ = vfs.mkdir("/empty").expect("mkdir");
        let _ = vfs.remove("/empty", false).expect("empty dir removes without flag");
    }

    #[test]
    fn rename_moves_content_and_never_overwrites() {
        let (mut vfs, _, _) = fixture();
        let _ = vfs.write_file("/a", "X").expect("write");
        let _ = vfs.rename("/a", "/b").expect("rename");
        assert_eq!(vfs.read_file("/b").expect("read"), "X");
        assert!(!vfs.exists("/a"));

        let _ = vfs.write_file("/c", "Y").expect("write");
        assert!(matches!(vfs.rename("/b", "/c"), Err(VfsError::AlreadyExists { .. })));
        assert!(matches!(vfs.rename("/zzz", "/d"), Err(VfsError::NotFound { .. })));
        assert!(matches!(vfs.rename("/b", "/no/dir"), Err(VfsError::NoParent { .. })));
        assert_eq!(vfs.rename("/", "/x"), Err(VfsError::RootProtected));
    }

    #[test]
    fn rename_rejects_moving_directory_into_itself() {
        let (mut vfs, _, _) = fixture();
        let err = vfs
            .rename("/home", "/home/user/home")
            .expect_err("cycle rejected");
        assert!(matches!(err, VfsError::MoveIntoSelf { .. }));
        assert!(vfs.exists("/home/user"));
    }

    #[test]
    fn rename_preserves_node_timestamps() {
        let (mut vfs, _, clock) = fixture();
        let _ = vfs.write_file("/tmp/a", "x").expect("write");
        clock.advance(100);
        let _ = vfs.rename("/tmp/a", "/tmp/b").expect("rename");
        let meta = vfs.stat("/tmp/b").expect("stat");
        assert_eq!(meta.created_at_unix_ms, 1_000);
        assert_eq!(meta.modified_at_unix_ms, 1_000);
    }

    #[test]
    fn copy_stamps_only_the_copy_root() {
        let (mut vfs, _, clock) = fixture();
        clock.advance(9_000);
        let _ = vfs
            .copy("/home/user/Documents", "/tmp/docs")
            .expect("copy");

        let root_meta = vfs.stat("/tmp/docs").expect("stat");
        assert_eq!(root_meta.created_at_unix_ms, 10_000);
        assert_eq!(root_meta.modified_at_unix_ms, 10_000);

        let nested = vfs.stat("/tmp/docs/welcome.txt").expect("nested");
        assert_eq!(nested.created_at_unix_ms, 1_000);
        assert_eq!(
            vfs.read_file("/tmp/docs/notes.md").expect("read"),
            vfs.read_file("/home/user/Documents/notes.md").expect("read")
        );
        assert!(vfs.exists("/home/user/Documents/welcome.txt"));
    }

    #[test]
    fn copy_into_own_subtree_is_a_snapshot() {
        let (mut vfs, _, _) = fixture();
        let _ = vfs.copy("/tmp", "/tmp/inner").expect("copy");
        assert!(vfs.exists("/tmp/inner"));
        assert!(!vfs.exists("/tmp/inner/inner"));
    }

    #[test]
    fn chmod_only_applies_to_files() {
        let (mut vfs, _, _) = fixture();
        let _ = vfs.chmod("/home/user/.bashrc", true).expect("chmod");
        assert!(vfs.stat("/home/user/.bashrc").expect("stat").executable);
        assert!(matches!(vfs.chmod("/tmp", true), Err(VfsError::NotAFile { .. })));
        assert!(matches!(vfs.chmod("/nope", true), Err(VfsError::NotFound { .. })));
    }

    #[test]
    fn reset_restores_the_seed_tree() {
        let (mut vfs, store, _) = fixture();
        let _ = vfs.remove("/home", true).expect("remove");
        let _ = vfs.write_file("/extra", "x").expect("write");

        assert_eq!(vfs.reset(), SaveStatus::Saved);
        assert!(vfs.exists("/home/user/Documents/welcome.txt"));
        assert!(!vfs.exists("/extra"));
        assert!(store
            .raw(VFS_STORAGE_KEY)
            .expect("persisted")
            .contains("welcome.txt"));
    }

    #[test]
    fn storage_failure_keeps_mutation_and_reports_degraded_mode() {
        let (mut vfs, store, _) = fixture();
        store.set_read_only(true);

        let status = vfs.write_file("/tmp/a", "x").expect("write applies");
        assert_eq!(status, SaveStatus::InMemoryOnly);
        assert_eq!(vfs.save_status(), SaveStatus::InMemoryOnly);
        assert_eq!(vfs.read_file("/tmp/a").expect("in memory"), "x");

        store.set_read_only(false);
        let status = vfs.write_file("/tmp/b", "y").expect("write");
        assert!(status.is_saved());
    }

    #[test]
    fn corrupt_or_missing_blob_falls_back_to_seed() {
        let store = MemoryKeyValueStore::default();
        store.save(VFS_STORAGE_KEY, "{ definitely not json").expect("save");
        let vfs = VirtualFileSystem::load(Rc::new(store.clone()), Rc::new(ManualClock::new(0)));
        assert!(vfs.exists("/home/user/.bashrc"));

        store
            .save(VFS_STORAGE_KEY, r#"{"/": {"type": "file", "content": "x"}}"#)
            .expect("save");
        let vfs = VirtualFileSystem::load(Rc::new(store), Rc::new(ManualClock::new(0)));
        assert!(vfs.root().is_dir());
    }

    #[test]
    fn persisted_tree_is_reloaded() {
        let (mut vfs, store, clock) = fixture();
        let _ = vfs.mkdir("/projects").expect("mkdir");
        let _ = vfs.write_file("/projects/readme", "hi").expect("write");

        let reloaded = VirtualFileSystem::load(Rc::new(store), Rc::new(clock));
        assert_eq!(reloaded.read_file("/projects/readme").expect("read"), "hi");
    }

    #[test]
    fn relative_paths_resolve_against_root_and_helper_resolves_against_cwd() {
        let (vfs, _, _) = fixture();
        assert!(vfs.exists("home/user"));
        let resolved = VirtualFileSystem::resolve("../Projects", "/home/user/Documents");
        assert_eq!(resolved, "/home/user/Projects");
        assert!(vfs.exists(&resolved));
    }

    #[test]
    fn names_are_taken_verbatim() {
        let (mut vfs, _, _) = fixture();
        let _ = vfs.write_file("/tmp/ padded.txt ", "x").expect("write");
        let _ = vfs.write_file("/tmp/back\\slash", "y").expect("write");

        let names: Vec<_> = vfs
            .list_dir("/tmp")
            .expect("list tmp")
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec![" padded.txt ", "back\\slash"]);
        assert_eq!(vfs.read_file("/tmp/ padded.txt ").as_deref(), Ok("x"));
        assert_eq!(
            vfs.read_file("/tmp/padded.txt"),
            Err(VfsError::NotFound {
                path: "/tmp/padded.txt".to_string()
            })
        );
    }
}
