/// DirSleuth Core: scanning, analysis, treemap layout and data model.
///
/// This crate contains all business logic with zero UI dependencies.
/// Frontends drive a scan, consume its event stream, then lay out and
/// hit-test the finished tree.
///
/// # Modules
///
/// - [`model`]: Arena-allocated file tree and supporting types.
/// - [`scanner`]: Background filesystem scanning with progress reporting.
/// - [`analysis`]: Post-scan analysis (top files, file categories).
/// - [`treemap`]: Squarified layout, hit testing and navigation.
/// - [`config`]: Scan and layout options.
/// - [`error`]: Error types.
pub mod analysis;
pub mod config;
pub mod error;
pub mod model;
pub mod scanner;
pub mod treemap;

pub use config::{LayoutOptions, ScanOptions};
pub use error::ScanError;
pub use model::{FileNode, FileTree, NodeIndex, SizeMetric};
