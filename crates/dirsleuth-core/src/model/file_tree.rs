/// Arena-backed file tree with O(n) bottom-up size aggregation.
///
/// All nodes live in a single `Vec<FileNode>`. Relationships between nodes
/// use `NodeIndex` (a thin `u32` wrapper) rather than heap pointers, giving
/// cache-friendly traversal and a strictly tree-shaped ownership model.
use super::file_node::{FileNode, NodeIndex};
use super::size::SizeMetric;
use std::cmp::Ordering;
use std::path::PathBuf;

/// Number of entries kept in [`FileTree::largest_files`].
pub const LARGEST_FILES_CAP: usize = 100;

/// The complete file tree produced by a scan.
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    /// Arena: every node in a flat, cache-friendly vector.
    pub nodes: Vec<FileNode>,

    /// The scan root. `None` only for a tree nothing has been added to yet.
    pub root: Option<NodeIndex>,

    /// Indices of the largest individual files, sorted descending by size.
    pub largest_files: Vec<NodeIndex>,
}

impl FileTree {
    /// Create an empty tree with pre-allocated capacity.
    pub fn with_capacity(estimated_nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(estimated_nodes),
            root: None,
            largest_files: Vec::new(),
        }
    }

    /// Allocate a new node in the arena and return its index.
    pub fn add_node(&mut self, node: FileNode) -> NodeIndex {
        let idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(node);
        idx
    }

    /// Add the root directory to the tree, replacing any previous root link.
    pub fn add_root(&mut self, mut node: FileNode) -> NodeIndex {
        node.parent = None;
        let idx = self.add_node(node);
        self.root = Some(idx);
        idx
    }

    /// Attach `child` as a child of `parent`, prepending to the sibling list.
    ///
    /// This is O(1): new children are inserted at the head of the linked list.
    /// The parent must already be in the arena *before* the child; the reverse
    /// aggregation pass relies on it.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        debug_assert!(parent < child, "children must be allocated after their parent");
        let old_first = self.nodes[parent.idx()].first_child;
        self.nodes[child.idx()].next_sibling = old_first;
        self.nodes[child.idx()].parent = Some(parent);
        self.nodes[parent.idx()].first_child = Some(child);
    }

    /// Run the post-scan passes: aggregation, child ordering and the
    /// largest-files cache.
    pub fn finalise(&mut self) {
        self.aggregate_sizes();
        self.sort_children_by_size();
        self.compute_largest_files(LARGEST_FILES_CAP);
    }

    /// Compute totals and counts for every node in a single bottom-up pass.
    ///
    /// Because children are always inserted after their parent in the arena,
    /// iterating in *reverse* guarantees that every child's subtree is complete
    /// before it is folded into its parent. O(n), no recursion, no stack.
    ///
    /// Safe to call repeatedly; aggregates are reset before each pass.
    pub fn aggregate_sizes(&mut self) {
        for node in self.nodes.iter_mut() {
            node.reset_aggregates();
        }

        for i in (0..self.nodes.len()).rev() {
            let node = &self.nodes[i];
            let Some(parent_idx) = node.parent else {
                continue;
            };
            let (size, alloc, files, dirs) = (
                node.total_size,
                node.total_allocated_size,
                node.file_count,
                node.directory_count,
            );
            let parent = &mut self.nodes[parent_idx.idx()];
            parent.total_size += size;
            parent.total_allocated_size += alloc;
            parent.file_count += files;
            parent.directory_count += dirs;
        }
    }

    /// Order every directory's children by descending `total_size`.
    ///
    /// Equal sizes fall back to ascending name so the order is reproducible
    /// regardless of the order the scanner attached children in.
    pub fn sort_children_by_size(&mut self) {
        for i in 0..self.nodes.len() {
            if !self.nodes[i].is_dir || self.nodes[i].first_child.is_none() {
                continue;
            }
            let mut children = self.children(NodeIndex::new(i));
            children.sort_by(|&a, &b| self.compare_by_size(a, b));

            // Relink the sibling list in sorted order.
            let mut next = None;
            for &child in children.iter().rev() {
                self.nodes[child.idx()].next_sibling = next;
                next = Some(child);
            }
            self.nodes[i].first_child = next;
        }
    }

    fn compare_by_size(&self, a: NodeIndex, b: NodeIndex) -> Ordering {
        let a_node = &self.nodes[a.idx()];
        let b_node = &self.nodes[b.idx()];
        b_node
            .total_size
            .cmp(&a_node.total_size)
            .then_with(|| a_node.name.cmp(&b_node.name))
    }

    /// Find the N largest individual files by own size.
    ///
    /// Uses `select_nth_unstable_by` (O(n) average) to bring the top-N
    /// elements to the front, then sorts only those N elements.
    fn compute_largest_files(&mut self, n: usize) {
        if n == 0 {
            self.largest_files.clear();
            return;
        }

        let mut file_indices: Vec<NodeIndex> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.is_dir)
            .map(|(i, _)| NodeIndex::new(i))
            .collect();

        let by_size_desc = |a: &NodeIndex, b: &NodeIndex| {
            self.nodes[b.idx()]
                .own_size
                .cmp(&self.nodes[a.idx()].own_size)
                .then(a.cmp(b))
        };

        if file_indices.len() > n {
            file_indices.select_nth_unstable_by(n - 1, by_size_desc);
            file_indices.truncate(n);
        }
        file_indices.sort_unstable_by(by_size_desc);

        self.largest_files = file_indices;
    }

    /// Reconstruct the full path for a node by walking up to the root.
    ///
    /// The root node's name is the scan root path as it was given, so the
    /// result is a usable filesystem path.
    pub fn full_path(&self, index: NodeIndex) -> PathBuf {
        let mut segments = Vec::new();
        let mut current = Some(index);
        while let Some(idx) = current {
            segments.push(self.nodes[idx.idx()].name.as_str());
            current = self.nodes[idx.idx()].parent;
        }
        segments.iter().rev().collect()
    }

    /// Get the ordered direct children of a node.
    pub fn children(&self, parent: NodeIndex) -> Vec<NodeIndex> {
        let mut children = Vec::new();
        let mut child = self.nodes[parent.idx()].first_child;
        while let Some(idx) = child {
            children.push(idx);
            child = self.nodes[idx.idx()].next_sibling;
        }
        children
    }

    /// Direct children that are directories, in child order.
    pub fn directory_children(&self, parent: NodeIndex) -> Vec<NodeIndex> {
        self.children(parent)
            .into_iter()
            .filter(|c| self.nodes[c.idx()].is_dir)
            .collect()
    }

    /// Percentage (0.0–100.0) of the parent's size that `index` accounts for
    /// under `metric`. The root is always 100%.
    pub fn percent_of_parent(&self, index: NodeIndex, metric: SizeMetric) -> f64 {
        let node = &self.nodes[index.idx()];
        let parent_size = match node.parent {
            Some(p) => metric.of(&self.nodes[p.idx()]),
            None => return 100.0,
        };
        if parent_size == 0 {
            0.0
        } else {
            metric.of(node) as f64 / parent_size as f64 * 100.0
        }
    }

    /// Get the node at the given index.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &FileNode {
        &self.nodes[index.idx()]
    }

    /// The root node, if any.
    pub fn root_node(&self) -> Option<&FileNode> {
        self.root.map(|r| self.node(r))
    }

    /// Total logical size of the whole tree (0 for an empty tree).
    pub fn total_size(&self) -> u64 {
        self.root_node().map_or(0, |r| r.total_size)
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
