/// Parallel, device-bounded directory walker.
///
/// Each directory is one unit of work: list it, stat every entry through the
/// listing, count new files, then fan out into subdirectories on the rayon
/// pool and join their results before returning. The listing (and with it
/// the directory handle) is dropped before any recursion starts, so the
/// number of open handles tracks tree depth rather than breadth.
///
/// Subtrees are built as plain owned values (`ScannedDir`) and only grafted
/// into the `FileTree` arena once the walk is over. That keeps the walk
/// lock-free apart from the O(1) bookkeeping in [`ScanState`].
use crate::analysis::{categorise_extension, extension_of};
use crate::model::{FileNode, FileTree, NodeIndex};
use crate::scanner::fs::{EntryKind, EntryStat, FsProvider, ListedEntry};
use crate::scanner::progress::ScanEvent;
use crate::scanner::state::{ScanState, ScanTotals};
use compact_str::CompactString;
use crossbeam_channel::{Sender, TrySendError};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// A fully walked directory whose children are not yet in the arena.
#[derive(Debug)]
pub(crate) struct ScannedDir {
    node: FileNode,
    files: Vec<FileNode>,
    subdirs: Vec<ScannedDir>,
}

/// Everything a directory task needs, shared by reference across the pool.
pub(crate) struct ScanContext<'a, P: FsProvider> {
    pub fs: &'a P,
    pub state: &'a ScanState,
    pub events: &'a Sender<ScanEvent>,
    pub cancel: &'a AtomicBool,
    pub progress_interval: u64,
}

impl<P: FsProvider> ScanContext<'_, P> {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Best-effort progress: dropped when the channel is full, and a
    /// disconnected consumer is treated as a cancellation request.
    pub fn emit_progress(&self, totals: ScanTotals, current_path: PathBuf) {
        if self.is_cancelled() {
            return;
        }
        let event = ScanEvent::Progress {
            files_found: totals.files_found,
            dirs_found: totals.dirs_found,
            total_size: totals.total_size,
            current_path,
        };
        if let Err(TrySendError::Disconnected(_)) = self.events.try_send(event) {
            self.cancel.store(true, Ordering::Relaxed);
        }
    }
}

/// A subdirectory discovered while listing its parent.
struct PendingDir {
    path: PathBuf,
    name: CompactString,
    stat: EntryStat,
}

/// Walk the directory at `path` whose own metadata is `stat`.
///
/// Returns `None` only when cancellation was observed before the directory
/// was started. A directory that cannot be listed is still returned, with
/// no children.
pub(crate) fn scan_directory<P: FsProvider>(
    ctx: &ScanContext<'_, P>,
    path: PathBuf,
    name: CompactString,
    stat: EntryStat,
) -> Option<ScannedDir> {
    if ctx.is_cancelled() {
        return None;
    }

    let mut dir = ScannedDir {
        node: FileNode::new_dir(stat.inode, name, stat.size, stat.allocated)
            .with_modified(stat.modified),
        files: Vec::new(),
        subdirs: Vec::new(),
    };

    let pending = match ctx.fs.read_dir(&path) {
        Ok(listing) => list_entries(ctx, &path, listing, &mut dir.files),
        Err(err) => {
            debug!("Cannot open {}: {err}", path.display());
            return Some(dir);
        }
    };

    dir.subdirs = match pending.len() {
        0 => Vec::new(),
        // A lone subdirectory is not worth a parallel dispatch.
        1 => pending
            .into_iter()
            .filter_map(|p| scan_directory(ctx, p.path, p.name, p.stat))
            .collect(),
        _ => pending
            .into_par_iter()
            .filter_map(|p| scan_directory(ctx, p.path, p.name, p.stat))
            .collect(),
    };

    Some(dir)
}

/// Consume one directory listing, pushing new file nodes into `files` and
/// returning the subdirectories to descend into. The listing is dropped on
/// return, closing the directory handle.
fn list_entries<P: FsProvider>(
    ctx: &ScanContext<'_, P>,
    dir_path: &Path,
    listing: P::Listing,
    files: &mut Vec<FileNode>,
) -> Vec<PendingDir> {
    let mut pending = Vec::new();

    for entry in listing {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                trace!("Listing error under {}: {err}", dir_path.display());
                continue;
            }
        };

        let os_name = entry.name();
        if os_name == "." || os_name == ".." {
            continue;
        }
        if entry.kind_hint() == Some(EntryKind::Other) {
            continue;
        }

        let stat = match entry.stat() {
            Ok(s) => s,
            Err(err) => {
                trace!("Cannot stat {:?} in {}: {err}", os_name, dir_path.display());
                continue;
            }
        };

        if !ctx.state.same_device(stat.device) {
            trace!("Skipping {:?} in {}: other device", os_name, dir_path.display());
            continue;
        }

        let name = CompactString::new(os_name.to_string_lossy());

        match stat.kind {
            EntryKind::Directory => {
                if !ctx.state.register_directory(stat.inode) {
                    trace!("Skipping {:?} in {}: directory already visited", os_name, dir_path.display());
                    continue;
                }
                pending.push(PendingDir {
                    path: dir_path.join(&os_name),
                    name,
                    stat,
                });
            }
            EntryKind::File => {
                let Some(totals) = ctx.state.register_file(stat.inode, stat.size) else {
                    trace!("Skipping {:?} in {}: inode already counted", os_name, dir_path.display());
                    continue;
                };
                let category = categorise_extension(extension_of(&name));
                files.push(
                    FileNode::new_file(stat.inode, name, stat.size, stat.allocated, category)
                        .with_modified(stat.modified),
                );
                if totals.files_found % ctx.progress_interval == 0 {
                    ctx.emit_progress(totals, dir_path.join(&os_name));
                }
            }
            EntryKind::Other => {}
        }
    }

    pending
}

/// Move a walked subtree into a fresh arena.
///
/// Iterative pre-order: every parent is allocated before its children,
/// which is the ordering the reverse aggregation pass requires.
pub(crate) fn build_tree(root: ScannedDir, capacity: usize) -> FileTree {
    let mut tree = FileTree::with_capacity(capacity);
    let mut stack: Vec<(Option<NodeIndex>, ScannedDir)> = vec![(None, root)];

    while let Some((parent, dir)) = stack.pop() {
        let ScannedDir {
            node,
            files,
            subdirs,
        } = dir;

        let idx = match parent {
            None => tree.add_root(node),
            Some(p) => {
                let idx = tree.add_node(node);
                tree.add_child(p, idx);
                idx
            }
        };

        for file in files {
            let child = tree.add_node(file);
            tree.add_child(idx, child);
        }
        stack.extend(subdirs.into_iter().map(|sub| (Some(idx), sub)));
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FileCategory;

    fn dir_node(inode: u64, name: &str) -> FileNode {
        FileNode::new_dir(inode, CompactString::new(name), 0, 0)
    }

    fn file_node(inode: u64, name: &str, size: u64) -> FileNode {
        FileNode::new_file(inode, CompactString::new(name), size, size, FileCategory::Other)
    }

    #[test]
    fn build_tree_places_parents_before_children() {
        let walked = ScannedDir {
            node: dir_node(1, "/top"),
            files: vec![file_node(2, "a", 5)],
            subdirs: vec![ScannedDir {
                node: dir_node(3, "sub"),
                files: vec![file_node(4, "b", 7)],
                subdirs: Vec::new(),
            }],
        };

        let mut tree = build_tree(walked, 4);
        assert_eq!(tree.len(), 4);
        for (i, node) in tree.nodes.iter().enumerate() {
            if let Some(p) = node.parent {
                assert!(p.idx() < i, "parent must precede child");
            }
        }

        tree.finalise();
        let root = tree.root.expect("root set");
        assert_eq!(tree.node(root).total_size, 12);
        assert_eq!(tree.node(root).file_count, 2);
        assert_eq!(tree.node(root).directory_count, 2);
    }
}
