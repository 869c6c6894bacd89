/// Scan-scoped shared state: inode dedup set and running totals.
///
/// Shared by every concurrently running directory task. All access goes
/// through one `parking_lot::Mutex` whose critical sections are O(1): a
/// set lookup/insert or a counter bump. No I/O ever happens under the lock.
use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Default)]
struct Counters {
    seen_inodes: HashSet<u64>,
    files_found: u64,
    dirs_found: u64,
    total_size: u64,
}

/// Running totals at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanTotals {
    /// Distinct files counted so far.
    pub files_found: u64,
    /// Distinct directories claimed so far, the root included.
    pub dirs_found: u64,
    /// Logical bytes of the counted files.
    pub total_size: u64,
}

/// Dedup set and counters shared by all directory tasks of one scan.
#[derive(Debug)]
pub struct ScanState {
    /// Device of the scan root. Entries elsewhere are skipped.
    root_device: u64,
    inner: Mutex<Counters>,
}

impl ScanState {
    /// Empty state for a scan rooted on `root_device`.
    pub fn new(root_device: u64) -> Self {
        Self {
            root_device,
            inner: Mutex::new(Counters::default()),
        }
    }

    /// `true` if an entry on `device` belongs to this scan.
    #[inline]
    pub fn same_device(&self, device: u64) -> bool {
        device == self.root_device
    }

    /// Count a file unless its inode was already seen.
    ///
    /// Returns the updated totals when the file is new, `None` for a hard
    /// link (or alias) of an inode that was already counted.
    pub fn register_file(&self, inode: u64, size: u64) -> Option<ScanTotals> {
        let mut inner = self.inner.lock();
        if !inner.seen_inodes.insert(inode) {
            return None;
        }
        inner.files_found += 1;
        inner.total_size += size;
        Some(ScanTotals {
            files_found: inner.files_found,
            dirs_found: inner.dirs_found,
            total_size: inner.total_size,
        })
    }

    /// Claim a directory inode for traversal. `false` means another path
    /// already reached this directory and the branch must be dropped.
    pub fn register_directory(&self, inode: u64) -> bool {
        let mut inner = self.inner.lock();
        if !inner.seen_inodes.insert(inode) {
            return false;
        }
        inner.dirs_found += 1;
        true
    }

    /// Snapshot of the running totals.
    pub fn totals(&self) -> ScanTotals {
        let inner = self.inner.lock();
        ScanTotals {
            files_found: inner.files_found,
            dirs_found: inner.dirs_found,
            total_size: inner.total_size,
        }
    }
}
