/// Scanner module: orchestrates filesystem scanning.
///
/// A scan runs on its own named thread, which owns a dedicated rayon pool
/// for directory fan-out. Results and progress flow back to the consumer
/// over a bounded crossbeam channel of [`ScanEvent`]s; cancellation is a
/// shared flag checked before each directory is started.
pub mod fs;
pub mod parallel;
pub mod progress;
pub mod state;

use crate::config::ScanOptions;
use crate::error::ScanError;
use crate::model::FileTree;
use fs::FsProvider;
use parallel::{build_tree, scan_directory, ScanContext};
use progress::ScanEvent;
use state::ScanState;

use compact_str::CompactString;
use crossbeam_channel::{Receiver, SendTimeoutError, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Worker stack size. Deep trees recurse one frame chain per level, and a
/// single-subdirectory chain recurses inline without a pool hop.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// How often a blocked final send re-checks the cancel flag.
const SEND_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Handle to a running or completed scan. Allows cancellation and
/// receiving events.
///
/// Dropping the handle cancels the scan.
pub struct ScanHandle {
    /// Receiver for events from the scan thread.
    pub events: Receiver<ScanEvent>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the scan thread.
    thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible. No further events are
    /// sent once the scanner observes the request.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// `true` once the scanner thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Block until the scan finishes, discarding progress events.
    pub fn wait(self) -> Result<FileTree, ScanError> {
        for event in self.events.iter() {
            match event {
                ScanEvent::Progress { .. } => continue,
                ScanEvent::Completed { tree, .. } => return Ok(tree),
                ScanEvent::Error { message } => return Err(ScanError::Failed(message)),
            }
        }
        Err(ScanError::Interrupted)
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Start a scan of the real filesystem on a background thread.
#[cfg(unix)]
pub fn start_scan(root_path: PathBuf, options: ScanOptions) -> Result<ScanHandle, ScanError> {
    start_scan_with(fs::OsFs, root_path, options)
}

/// Start a scan through any [`FsProvider`] on a background thread.
///
/// Returns a `ScanHandle` for receiving events and requesting cancellation.
pub fn start_scan_with<P>(
    provider: P,
    root_path: PathBuf,
    options: ScanOptions,
) -> Result<ScanHandle, ScanError>
where
    P: FsProvider + 'static,
{
    let (events_tx, events_rx) =
        crossbeam_channel::bounded::<ScanEvent>(options.channel_capacity.max(1));
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("dirsleuth-scanner".into())
        .spawn(move || run_scan(&provider, root_path, &options, &events_tx, &cancel_clone))
        .map_err(ScanError::Spawn)?;

    Ok(ScanHandle {
        events: events_rx,
        cancel_flag,
        thread: Some(thread),
    })
}

/// The body of the scanner thread.
fn run_scan<P: FsProvider>(
    provider: &P,
    root_path: PathBuf,
    options: &ScanOptions,
    events: &Sender<ScanEvent>,
    cancel: &AtomicBool,
) {
    let start = Instant::now();
    info!("Starting scan of {}", root_path.display());

    let outcome = walk(provider, &root_path, options, events, cancel);

    if cancel.load(Ordering::Relaxed) {
        info!("Scan of {} cancelled after {:?}", root_path.display(), start.elapsed());
        return;
    }

    let terminal = match outcome {
        Ok((mut tree, state)) => {
            debug!("Walk complete in {:?}. Running aggregation...", start.elapsed());
            tree.finalise();

            let totals = state.totals();
            let duration = start.elapsed();
            info!(
                "Scan complete: {} files, {} dirs, {} bytes in {duration:?}",
                totals.files_found, totals.dirs_found, totals.total_size
            );

            let final_progress = ScanEvent::Progress {
                files_found: totals.files_found,
                dirs_found: totals.dirs_found,
                total_size: totals.total_size,
                current_path: root_path,
            };
            if !send_unless_cancelled(events, cancel, final_progress) {
                return;
            }
            ScanEvent::Completed { tree, duration }
        }
        Err(err) => {
            warn!("Scan failed: {err}");
            ScanEvent::Error {
                message: err.to_string(),
            }
        }
    };

    // A closed channel means nobody is listening any more.
    send_unless_cancelled(events, cancel, terminal);
}

/// Deliver an event that must not be dropped, waiting for room in the
/// channel. Gives up once the scan is cancelled or the receiver is gone.
fn send_unless_cancelled(
    events: &Sender<ScanEvent>,
    cancel: &AtomicBool,
    mut event: ScanEvent,
) -> bool {
    loop {
        if cancel.load(Ordering::Relaxed) {
            debug!("Scan cancelled while delivering a final event");
            return false;
        }
        match events.send_timeout(event, SEND_POLL_INTERVAL) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(back)) => event = back,
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}

/// Stat the root, walk it on a dedicated pool and graft the result into an
/// arena. The tree is returned un-aggregated.
fn walk<P: FsProvider>(
    provider: &P,
    root_path: &std::path::Path,
    options: &ScanOptions,
    events: &Sender<ScanEvent>,
    cancel: &AtomicBool,
) -> Result<(FileTree, ScanState), ScanError> {
    let root_stat = provider
        .stat(root_path)
        .map_err(|source| ScanError::RootUnreadable {
            path: root_path.to_path_buf(),
            source,
        })?;

    let state = ScanState::new(root_stat.device);
    state.register_directory(root_stat.inode);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.worker_threads())
        .thread_name(|i| format!("dirsleuth-walk-{i}"))
        .stack_size(WORKER_STACK_SIZE)
        .build()?;

    let ctx = ScanContext {
        fs: provider,
        state: &state,
        events,
        cancel,
        progress_interval: options.progress_interval.max(1),
    };

    // The root node is named by the path as given so full paths rebuild.
    let root_name = CompactString::new(root_path.to_string_lossy());
    let walked = pool.install(|| {
        scan_directory(&ctx, root_path.to_path_buf(), root_name, root_stat)
    });

    let totals = state.totals();
    let capacity = (totals.files_found + totals.dirs_found) as usize;
    let tree = match walked {
        Some(root) => build_tree(root, capacity),
        // Only reachable when cancelled, which the caller checks first.
        None => FileTree::default(),
    };
    Ok((tree, state))
}
