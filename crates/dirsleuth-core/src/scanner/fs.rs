/// Filesystem provider seam.
///
/// The walker never touches `std::fs` directly; it goes through
/// [`FsProvider`] so the same traversal logic runs against the real
/// filesystem ([`OsFs`]) or an in-memory fake in tests.
///
/// Entries are stat'd through the listing they came from (see
/// [`ListedEntry::stat`]), which lets the OS implementation stat relative to
/// the open directory handle instead of re-resolving a full path per entry.
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Type of a filesystem entry as far as the scanner cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, sockets, devices, FIFOs. Never traversed or counted.
    Other,
}

/// The stat fields the scanner consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStat {
    /// Inode number, used for hard link and alias dedup.
    pub inode: u64,
    /// Device id, used to stay on the root's filesystem.
    pub device: u64,
    /// Logical length in bytes.
    pub size: u64,
    /// Bytes allocated on storage.
    pub allocated: u64,
    /// Last modification time, if the platform reports one.
    pub modified: Option<SystemTime>,
    /// What the entry is, from `lstat` (symlinks are never followed).
    pub kind: EntryKind,
}

/// One entry produced by a directory listing.
pub trait ListedEntry {
    /// Single path component.
    fn name(&self) -> OsString;

    /// Cheap type hint carried by the listing itself, if any.
    fn kind_hint(&self) -> Option<EntryKind>;

    /// Stat this entry relative to its open directory, without following
    /// symlinks.
    fn stat(&self) -> io::Result<EntryStat>;
}

/// Raw directory-entry and stat metadata source.
pub trait FsProvider: Send + Sync {
    type Entry: ListedEntry;
    type Listing: Iterator<Item = io::Result<Self::Entry>>;

    /// Stat a path without following a final symlink.
    fn stat(&self, path: &Path) -> io::Result<EntryStat>;

    /// Open a directory for listing. The returned listing holds the
    /// directory handle until it is dropped.
    fn read_dir(&self, path: &Path) -> io::Result<Self::Listing>;
}

#[cfg(unix)]
pub use os::OsFs;

#[cfg(unix)]
mod os {
    use super::{EntryKind, EntryStat, FsProvider, ListedEntry};
    use std::ffi::OsString;
    use std::fs::{self, DirEntry, FileType, Metadata, ReadDir};
    use std::io;
    use std::os::unix::fs::MetadataExt;
    use std::path::Path;

    /// `st_blocks` is always counted in 512-byte units.
    const BLOCK_UNIT: u64 = 512;

    /// The real filesystem, via `std::fs`.
    ///
    /// `DirEntry::file_type` reads `d_type` from the listing when the
    /// filesystem provides it, and `DirEntry::metadata` stats relative to the
    /// open directory descriptor without following symlinks.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct OsFs;

    impl FsProvider for OsFs {
        type Entry = DirEntry;
        type Listing = ReadDir;

        fn stat(&self, path: &Path) -> io::Result<EntryStat> {
            fs::symlink_metadata(path).map(|meta| stat_from_metadata(&meta))
        }

        fn read_dir(&self, path: &Path) -> io::Result<ReadDir> {
            fs::read_dir(path)
        }
    }

    impl ListedEntry for DirEntry {
        fn name(&self) -> OsString {
            self.file_name()
        }

        fn kind_hint(&self) -> Option<EntryKind> {
            self.file_type().ok().map(kind_of)
        }

        fn stat(&self) -> io::Result<EntryStat> {
            self.metadata().map(|meta| stat_from_metadata(&meta))
        }
    }

    fn kind_of(file_type: FileType) -> EntryKind {
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    fn stat_from_metadata(meta: &Metadata) -> EntryStat {
        EntryStat {
            inode: meta.ino(),
            device: meta.dev(),
            size: meta.len(),
            allocated: meta.blocks().saturating_mul(BLOCK_UNIT),
            modified: meta.modified().ok(),
            kind: kind_of(meta.file_type()),
        }
    }
}
