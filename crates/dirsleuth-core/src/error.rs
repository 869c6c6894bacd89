/// Error types for the scanning engine.
///
/// Only the conditions that end a scan are represented here. Unreadable
/// subdirectories, failed entry stats, cross-device entries and duplicate
/// inodes are handled in place and never become errors.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root could not be stat'd.
    #[error("cannot read scan root {}: {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The worker pool for directory fan-out could not be created.
    #[error("failed to start scanner workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The background scanner thread could not be spawned.
    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] io::Error),

    /// The scanner reported a fatal error event.
    #[error("{0}")]
    Failed(String),

    /// The event stream closed without a terminal event (cancelled scan).
    #[error("scan ended without a result")]
    Interrupted,
}
