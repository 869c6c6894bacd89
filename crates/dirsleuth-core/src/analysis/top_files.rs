/// Top-N largest files analysis.
///
/// Extracts the largest individual files from a scanned `FileTree`
/// for summary output.
use crate::model::{FileTree, NodeIndex};
use std::path::PathBuf;

/// A single entry in the "largest files" results.
#[derive(Debug, Clone)]
pub struct LargestFile {
    /// Index into the file tree arena.
    pub index: NodeIndex,
    /// Full path (reconstructed).
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
}

/// Get the top N largest files from the tree.
///
/// The tree pre-computes `largest_files` in [`FileTree::finalise`], so this
/// function simply reads from that cache and enriches with full paths.
pub fn top_files(tree: &FileTree, n: usize) -> Vec<LargestFile> {
    tree.largest_files
        .iter()
        .take(n)
        .map(|&idx| LargestFile {
            index: idx,
            path: tree.full_path(idx),
            size: tree.node(idx).own_size,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FileCategory;
    use crate::model::FileNode;
    use compact_str::CompactString;

    #[test]
    fn top_files_returns_paths_in_size_order() {
        let mut tree = FileTree::with_capacity(4);
        let root = tree.add_root(FileNode::new_dir(1, CompactString::new("/data"), 0, 0));
        for (inode, name, size) in [(2, "a.bin", 10), (3, "b.bin", 30), (4, "c.bin", 20)] {
            let idx = tree.add_node(FileNode::new_file(
                inode,
                CompactString::new(name),
                size,
                size,
                FileCategory::Other,
            ));
            tree.add_child(root, idx);
        }
        tree.finalise();

        let top = top_files(&tree, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].path, PathBuf::from("/data/b.bin"));
        assert_eq!(top[0].size, 30);
        assert_eq!(top[1].size, 20);
    }
}
