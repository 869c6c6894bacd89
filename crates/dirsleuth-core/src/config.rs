/// Tunables for scanning and treemap layout.
///
/// Both option structs deserialise with per-field defaults so a frontend can
/// persist a partial configuration and still load it.
use crate::model::SizeMetric;
use serde::{Deserialize, Serialize};

/// Default number of new files between two progress events.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Maximum number of scan events that may queue up in the channel.
///
/// Progress events are dropped rather than queued once the channel is full,
/// so a slow consumer never stalls the walker.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 4_096;

/// Default maximum nesting depth rendered by the treemap.
pub const DEFAULT_MAX_DEPTH: usize = 12;

/// Default minimum cell area (px²) below which the treemap stops recursing.
pub const DEFAULT_MIN_PIXEL_AREA: f64 = 4.0;

/// Options for one filesystem scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Worker threads for directory fan-out. `None` uses one per logical CPU.
    pub threads: Option<usize>,
    /// Emit a progress event every this many newly counted files.
    pub progress_interval: u64,
    /// Bound of the event channel between the walker and the consumer.
    pub channel_capacity: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            threads: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ScanOptions {
    /// Resolved worker count, never zero.
    pub fn worker_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Options for one treemap layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Aggregate that drives cell proportions.
    pub metric: SizeMetric,
    /// Nodes at this depth are emitted as leaves.
    pub max_depth: usize,
    /// Cells smaller than this are emitted as leaves.
    pub min_pixel_area: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            metric: SizeMetric::Logical,
            max_depth: DEFAULT_MAX_DEPTH,
            min_pixel_area: DEFAULT_MIN_PIXEL_AREA,
        }
    }
}
