/// A single node in the arena-allocated file tree.
///
/// Nodes are stored in a flat `Vec<FileNode>` for cache-friendly traversal.
/// Parent-child relationships use indices rather than pointers, so the
/// parent link never owns anything and dropping the tree is a single
/// `Vec` deallocation.
use crate::analysis::FileCategory;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Lightweight index into the arena `Vec<FileNode>`.
///
/// Uses `u32` to keep nodes small; supports up to ~4 billion nodes,
/// which is more than enough for any real filesystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a new `NodeIndex` from a `usize`, panicking in debug builds if
    /// it exceeds `u32::MAX`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A single file or directory in the tree.
///
/// The `own_*` fields describe this entry alone and never change after
/// construction. The `total_*` and `*_count` fields are aggregates that are
/// only meaningful once [`FileTree::aggregate_sizes`] has run.
///
/// [`FileTree::aggregate_sizes`]: super::FileTree::aggregate_sizes
#[derive(Debug, Clone)]
pub struct FileNode {
    /// Inode number. Unique within one scan because cross-device entries are
    /// never admitted.
    pub inode: u64,

    /// File or directory name only (NOT the full path).
    /// Full paths are reconstructed on-demand by walking up via `parent`.
    pub name: CompactString,

    /// `true` if this node represents a directory.
    pub is_dir: bool,

    /// Logical size of this entry alone, in bytes.
    pub own_size: u64,

    /// Bytes actually allocated on disk for this entry alone. May differ from
    /// `own_size` due to block rounding or sparse files.
    pub allocated_size: u64,

    /// Extension-derived category. Directories are always `Other`.
    pub category: FileCategory,

    /// Last-modified timestamp, when the filesystem reported one.
    pub modified: Option<SystemTime>,

    /// Index of the parent node. `None` for the scan root.
    pub parent: Option<NodeIndex>,

    /// First child (directories only). Children form a singly-linked list
    /// via [`next_sibling`](Self::next_sibling).
    pub first_child: Option<NodeIndex>,

    /// Next sibling under the same parent.
    pub next_sibling: Option<NodeIndex>,

    /// `own_size` plus the `total_size` of every child.
    pub total_size: u64,

    /// `allocated_size` plus the `total_allocated_size` of every child.
    pub total_allocated_size: u64,

    /// Number of files in this subtree (1 for a file).
    pub file_count: u64,

    /// Number of directories in this subtree, counting this node itself.
    pub directory_count: u64,
}

impl FileNode {
    /// Create a file node. Aggregates start out equal to the node's own values.
    pub fn new_file(
        inode: u64,
        name: CompactString,
        size: u64,
        allocated_size: u64,
        category: FileCategory,
    ) -> Self {
        Self {
            inode,
            name,
            is_dir: false,
            own_size: size,
            allocated_size,
            category,
            modified: None,
            parent: None,
            first_child: None,
            next_sibling: None,
            total_size: size,
            total_allocated_size: allocated_size,
            file_count: 1,
            directory_count: 0,
        }
    }

    /// Create a directory node with its own (non-recursive) sizes.
    pub fn new_dir(inode: u64, name: CompactString, own_size: u64, allocated_size: u64) -> Self {
        Self {
            inode,
            name,
            is_dir: true,
            own_size,
            allocated_size,
            category: FileCategory::Other,
            modified: None,
            parent: None,
            first_child: None,
            next_sibling: None,
            total_size: own_size,
            total_allocated_size: allocated_size,
            file_count: 0,
            directory_count: 1,
        }
    }

    /// Attach a modification time.
    pub fn with_modified(mut self, modified: Option<SystemTime>) -> Self {
        self.modified = modified;
        self
    }

    /// Reset the aggregate fields to this node's own contribution.
    pub(crate) fn reset_aggregates(&mut self) {
        self.total_size = self.own_size;
        self.total_allocated_size = self.allocated_size;
        if self.is_dir {
            self.file_count = 0;
            self.directory_count = 1;
        } else {
            self.file_count = 1;
            self.directory_count = 0;
        }
    }
}
