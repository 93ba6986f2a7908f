//! Virtual file system node and metadata types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Storage key used for the persisted file system tree.
pub const VFS_STORAGE_KEY: &str = "virtualFS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// File system entry kind.
pub enum VfsEntryKind {
    /// File entry.
    File,
    /// Directory entry.
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// A node of the virtual file system tree.
///
/// Children are owned by their parent directory, so the tree cannot contain cycles.
pub enum VfsNode {
    /// Directory holding named children in insertion order.
    Directory {
        /// Child nodes keyed by name.
        #[serde(alias = "content", default)]
        children: IndexMap<String, VfsNode>,
        /// Creation time in unix milliseconds.
        #[serde(default)]
        created: u64,
        /// Last modification time in unix milliseconds.
        #[serde(default)]
        modified: u64,
    },
    /// Text file.
    File {
        /// File contents.
        #[serde(default)]
        content: String,
        /// Creation time in unix milliseconds.
        #[serde(default)]
        created: u64,
        /// Last modification time in unix milliseconds.
        #[serde(default)]
        modified: u64,
        /// Whether the file is marked executable.
        #[serde(default, skip_serializing_if = "is_false")]
        executable: bool,
    },
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl VfsNode {
    /// Creates an empty directory stamped with `now`.
    pub fn empty_dir(now: u64) -> Self {
        Self::Directory {
            children: IndexMap::new(),
            created: now,
            modified: now,
        }
    }

    /// Creates a file stamped with `now`.
    pub fn file(content: impl Into<String>, now: u64) -> Self {
        Self::File {
            content: content.into(),
            created: now,
            modified: now,
            executable: false,
        }
    }

    /// Returns the entry kind.
    pub fn kind(&self) -> VfsEntryKind {
        match self {
            Self::Directory { .. } => VfsEntryKind::Directory,
            Self::File { .. } => VfsEntryKind::File,
        }
    }

    /// Returns `true` for directories.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    /// Creation time in unix milliseconds.
    pub fn created(&self) -> u64 {
        match self {
            Self::Directory { created, .. } | Self::File { created, .. } => *created,
        }
    }

    /// Last modification time in unix milliseconds.
    pub fn modified(&self) -> u64 {
        match self {
            Self::Directory { modified, .. } | Self::File { modified, .. } => *modified,
        }
    }

    /// File size in bytes (files only).
    pub fn size(&self) -> Option<u64> {
        match self {
            Self::File { content, .. } => Some(content.len() as u64),
            Self::Directory { .. } => None,
        }
    }

    /// Whether this node is an executable file.
    pub fn is_executable(&self) -> bool {
        matches!(
            self,
            Self::File {
                executable: true,
                ..
            }
        )
    }

    /// Child map for directories.
    pub fn children(&self) -> Option<&IndexMap<String, VfsNode>> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }

    /// Mutable child map for directories.
    pub fn children_mut(&mut self) -> Option<&mut IndexMap<String, VfsNode>> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::File { .. } => None,
        }
    }

    /// Restamps both timestamps (used for the root of a copied subtree).
    pub fn restamp(&mut self, now: u64) {
        match self {
            Self::Directory {
                created, modified, ..
            }
            | Self::File {
                created, modified, ..
            } => {
                *created = now;
                *modified = now;
            }
        }
    }

    /// Returns a metadata snapshot for this node.
    pub fn metadata(&self) -> VfsMetadata {
        VfsMetadata {
            kind: self.kind(),
            created_at_unix_ms: self.created(),
            modified_at_unix_ms: self.modified(),
            size: self.size(),
            executable: self.is_executable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Serialized form of the whole tree: a single object keyed by `/`.
pub struct PersistedTree {
    /// Root directory.
    #[serde(rename = "/")]
    pub root: VfsNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Directory entry returned by listing operations.
pub struct VfsEntry {
    /// Base name of the entry.
    pub name: String,
    /// File or directory kind.
    pub kind: VfsEntryKind,
    /// File size in bytes (files only).
    pub size: Option<u64>,
    /// Last-modified time in unix milliseconds.
    pub modified_at_unix_ms: u64,
    /// Whether the entry is an executable file.
    pub executable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Metadata describing a single path.
pub struct VfsMetadata {
    /// File or directory kind.
    pub kind: VfsEntryKind,
    /// Creation time in unix milliseconds.
    pub created_at_unix_ms: u64,
    /// Last-modified time in unix milliseconds.
    pub modified_at_unix_ms: u64,
    /// File size in bytes (files only).
    pub size: Option<u64>,
    /// Whether the path is an executable file.
    pub executable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[must_use]
/// Outcome of persisting the tree after a successful mutation.
pub enum SaveStatus {
    /// The tree was written to durable storage.
    Saved,
    /// The mutation applied in memory but the durable write failed.
    InMemoryOnly,
}

impl SaveStatus {
    /// Returns `true` when the durable copy is current.
    pub fn is_saved(self) -> bool {
        matches!(self, Self::Saved)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn node_serializes_with_type_tag_and_optional_executable() {
        let plain = VfsNode::file("hi", 5);
        assert_eq!(
            serde_json::to_value(&plain).expect("serialize"),
            json!({ "type": "file", "content": "hi", "created": 5, "modified": 5 })
        );

        let mut exec = VfsNode::file("#!", 1);
        if let VfsNode::File { executable, .. } = &mut exec {
            *executable = true;
        }
        assert_eq!(
            serde_json::to_value(&exec).expect("serialize")["executable"],
            json!(true)
        );
    }

    #[test]
    fn directory_accepts_content_alias_and_keeps_order() {
        let raw = json!({
            "/": {
                "type": "directory",
                "content": {
                    "zeta": { "type": "directory", "content": {}, "created": 1, "modified": 1 },
                    "alpha": { "type": "file", "content": "a", "created": 2, "modified": 3 }
                },
                "created": 1,
                "modified": 1
            }
        });

        let tree: PersistedTree = serde_json::from_value(raw).expect("deserialize");
        let names: Vec<_> = tree
            .root
            .children()
            .expect("dir")
            .keys()
            .cloned()
            .collect();
        assert_eq!(names, vec!["zeta".to_string(), "alpha".to_string()]);

        let reserialized = serde_json::to_value(&tree).expect("serialize");
        assert!(reserialized["/"]["children"]["alpha"].is_object());
    }
}
