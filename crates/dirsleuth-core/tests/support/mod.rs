//! In-memory filesystem for driving the scanner deterministically.
#![allow(dead_code)]

use crossbeam_channel::{Receiver, Sender};
use dirsleuth_core::scanner::fs::{EntryKind, EntryStat, FsProvider, ListedEntry};
use dirsleuth_core::scanner::progress::ScanEvent;
use dirsleuth_core::scanner::ScanHandle;
use dirsleuth_core::FileTree;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

pub const ROOT_DEVICE: u64 = 1;
const BLOCK: u64 = 4096;

struct MemNode {
    stat: Option<EntryStat>,
    hint: Option<EntryKind>,
    children: Vec<OsString>,
    unreadable: bool,
}

/// A tree of paths with hand-picked inodes, devices and failure points.
pub struct MemoryFs {
    nodes: HashMap<PathBuf, MemNode>,
    next_inode: u64,
    gate: Option<(PathBuf, Receiver<()>)>,
}

pub struct MemEntry {
    name: OsString,
    hint: Option<EntryKind>,
    stat: Option<EntryStat>,
}

impl ListedEntry for MemEntry {
    fn name(&self) -> OsString {
        self.name.clone()
    }

    fn kind_hint(&self) -> Option<EntryKind> {
        self.hint
    }

    fn stat(&self) -> io::Result<EntryStat> {
        self.stat
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::PermissionDenied, "stat refused"))
    }
}

impl FsProvider for MemoryFs {
    type Entry = MemEntry;
    type Listing = std::vec::IntoIter<io::Result<MemEntry>>;

    fn stat(&self, path: &Path) -> io::Result<EntryStat> {
        self.nodes
            .get(path)
            .and_then(|n| n.stat.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such path"))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Self::Listing> {
        if let Some((gated, release)) = &self.gate {
            if gated == path {
                // Blocks until the test sends or drops its sender.
                let _ = release.recv();
            }
        }

        let node = self
            .nodes
            .get(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such path"))?;
        if node.unreadable {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "listing refused"));
        }
        if !matches!(&node.stat, Some(s) if s.kind == EntryKind::Directory) {
            return Err(io::Error::other("not a directory"));
        }

        let entries: Vec<io::Result<MemEntry>> = node
            .children
            .iter()
            .map(|name| {
                let child = &self.nodes[&path.join(name)];
                Ok(MemEntry {
                    name: name.clone(),
                    hint: child.hint,
                    stat: child.stat.clone(),
                })
            })
            .collect();
        Ok(entries.into_iter())
    }
}

impl MemoryFs {
    /// A filesystem holding one empty directory at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let mut fs = Self {
            nodes: HashMap::new(),
            next_inode: 1,
            gate: None,
        };
        let inode = fs.fresh_inode();
        fs.nodes.insert(
            root.as_ref().to_path_buf(),
            MemNode {
                stat: Some(stat(inode, ROOT_DEVICE, 0, EntryKind::Directory)),
                hint: Some(EntryKind::Directory),
                children: Vec::new(),
                unreadable: false,
            },
        );
        fs
    }

    pub fn dir(self, path: impl AsRef<Path>) -> Self {
        self.dir_on_device(path, ROOT_DEVICE)
    }

    pub fn dir_on_device(mut self, path: impl AsRef<Path>, device: u64) -> Self {
        let inode = self.fresh_inode();
        self.insert(path.as_ref(), Some(stat(inode, device, 0, EntryKind::Directory)));
        self
    }

    /// A directory with an explicit inode, for building bind mounts and
    /// other directory aliases.
    pub fn dir_with_inode(mut self, path: impl AsRef<Path>, inode: u64) -> Self {
        self.insert(path.as_ref(), Some(stat(inode, ROOT_DEVICE, 0, EntryKind::Directory)));
        self
    }

    /// Inode of an entry already added.
    pub fn inode_of(&self, path: impl AsRef<Path>) -> u64 {
        self.nodes[path.as_ref()]
            .stat
            .as_ref()
            .expect("entry has a stat")
            .inode
    }

    pub fn file(self, path: impl AsRef<Path>, size: u64) -> Self {
        self.file_on_device(path, size, ROOT_DEVICE)
    }

    pub fn file_on_device(mut self, path: impl AsRef<Path>, size: u64, device: u64) -> Self {
        let inode = self.fresh_inode();
        self.insert(path.as_ref(), Some(stat(inode, device, size, EntryKind::File)));
        self
    }

    /// A file with an explicit inode, for building hard links.
    pub fn file_with_inode(mut self, path: impl AsRef<Path>, size: u64, inode: u64) -> Self {
        self.insert(path.as_ref(), Some(stat(inode, ROOT_DEVICE, size, EntryKind::File)));
        self
    }

    pub fn symlink(mut self, path: impl AsRef<Path>) -> Self {
        let inode = self.fresh_inode();
        self.insert(path.as_ref(), Some(stat(inode, ROOT_DEVICE, 12, EntryKind::Other)));
        self
    }

    /// An entry that lists fine but whose stat fails.
    pub fn unstattable(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), None);
        self
    }

    /// A directory that stats fine but cannot be listed.
    pub fn unreadable(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(node) = self.nodes.get_mut(path.as_ref()) {
            node.unreadable = true;
        }
        self
    }

    /// Make listings of `path` block until the returned sender fires or is
    /// dropped.
    pub fn gate(&mut self, path: impl AsRef<Path>) -> Sender<()> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.gate = Some((path.as_ref().to_path_buf(), rx));
        tx
    }

    fn fresh_inode(&mut self) -> u64 {
        // Stay clear of inodes tests pick by hand.
        let inode = 10_000 + self.next_inode;
        self.next_inode += 1;
        inode
    }

    fn insert(&mut self, path: &Path, stat: Option<EntryStat>) {
        let parent = path.parent().expect("entry needs a parent");
        let name = path.file_name().expect("entry needs a name").to_os_string();
        let hint = stat.as_ref().map(|s| s.kind);
        self.nodes
            .get_mut(parent)
            .expect("parent must be added first")
            .children
            .push(name);
        self.nodes.insert(
            path.to_path_buf(),
            MemNode {
                stat,
                hint,
                children: Vec::new(),
                unreadable: false,
            },
        );
    }
}

fn stat(inode: u64, device: u64, size: u64, kind: EntryKind) -> EntryStat {
    EntryStat {
        inode,
        device,
        size,
        allocated: size.div_ceil(BLOCK) * BLOCK,
        modified: None,
        kind,
    }
}

/// Drain every event the scan sends, in order, until the stream closes.
pub fn collect_events(handle: &ScanHandle) -> Vec<ScanEvent> {
    handle.events.iter().collect()
}

/// The tree carried by the stream's `Completed` event.
pub fn completed_tree(events: Vec<ScanEvent>) -> FileTree {
    events
        .into_iter()
        .find_map(|e| match e {
            ScanEvent::Completed { tree, .. } => Some(tree),
            _ => None,
        })
        .expect("scan did not complete")
}

/// Find a direct child of `parent` by name.
pub fn child_named(
    tree: &FileTree,
    parent: dirsleuth_core::NodeIndex,
    name: &str,
) -> Option<dirsleuth_core::NodeIndex> {
    tree.children(parent)
        .into_iter()
        .find(|&c| tree.node(c).name == name)
}
