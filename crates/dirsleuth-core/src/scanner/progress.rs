/// Scan events: messages sent from the scan thread to the consumer via a
/// crossbeam channel.
///
/// A scan produces zero or more `Progress` events followed by exactly one
/// terminal event (`Completed` or `Error`), unless it is cancelled, in which
/// case the stream simply ends.
use crate::model::FileTree;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug)]
pub enum ScanEvent {
    /// Periodic update with running totals.
    Progress {
        files_found: u64,
        dirs_found: u64,
        total_size: u64,
        current_path: PathBuf,
    },
    /// Scanning finished. The tree is aggregated and sorted.
    Completed { tree: FileTree, duration: Duration },
    /// The scan root was unreadable; nothing was scanned.
    Error { message: String },
}

impl ScanEvent {
    /// `true` for `Completed` and `Error`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}
