//! DirSleuth: disk usage analyser.
//!
//! Thin binary entry point. All logic lives in the `dirsleuth-core` crate;
//! this file scans the requested path, shows live progress on stderr and
//! prints a summary (or treemap cells) to stdout.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::Cli;
use dirsleuth_core::analysis::{category_breakdown, top_files};
use dirsleuth_core::model::size::{format_count, format_size};
use dirsleuth_core::scanner::progress::ScanEvent;
use dirsleuth_core::scanner::ScanHandle;
use dirsleuth_core::treemap::{hit_test, layout, Point, Rect, TreemapItem};
use dirsleuth_core::{FileTree, LayoutOptions, NodeIndex, ScanOptions, SizeMetric};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Minimum gap between two progress lines.
const PROGRESS_THROTTLE: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the report.
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .init();

    tracing::info!("DirSleuth starting");

    let options = ScanOptions {
        threads: cli.threads,
        ..ScanOptions::default()
    };
    let handle = begin_scan(cli.path.clone(), options)?;
    let (tree, duration) = wait_with_progress(&handle, io::stderr().is_terminal())
        .with_context(|| format!("scanning {}", cli.path.display()))?;
    let Some(root) = tree.root else {
        bail!("scan of {} produced an empty tree", cli.path.display());
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.treemap {
        Some(viewport) => {
            let layout_options = LayoutOptions {
                metric: cli.metric(),
                max_depth: cli.depth,
                ..LayoutOptions::default()
            };
            let items = layout(&tree, root, viewport, &layout_options);
            if cli.json {
                write_cells_json(&mut out, &tree, &items, cli.hit, cli.metric())?;
            } else {
                write_summary(&mut out, &tree, root, duration, &cli)?;
                write_treemap_report(&mut out, &tree, &items, viewport, cli.hit)?;
            }
        }
        None => write_summary(&mut out, &tree, root, duration, &cli)?,
    }

    out.flush()?;
    Ok(())
}

#[cfg(unix)]
fn begin_scan(path: PathBuf, options: ScanOptions) -> Result<ScanHandle> {
    dirsleuth_core::scanner::start_scan(path, options).context("failed to start scan")
}

#[cfg(not(unix))]
fn begin_scan(_path: PathBuf, _options: ScanOptions) -> Result<ScanHandle> {
    bail!("scanning the local filesystem is only supported on Unix")
}

/// Drain the event stream, redrawing a single progress line at most every
/// [`PROGRESS_THROTTLE`].
fn wait_with_progress(handle: &ScanHandle, show_progress: bool) -> Result<(FileTree, Duration)> {
    let mut last_draw: Option<Instant> = None;
    let mut stderr = io::stderr();

    for event in handle.events.iter() {
        match event {
            ScanEvent::Progress {
                files_found,
                dirs_found,
                total_size,
                current_path,
            } => {
                if !show_progress || last_draw.is_some_and(|t| t.elapsed() < PROGRESS_THROTTLE) {
                    continue;
                }
                let _ = write!(
                    stderr,
                    "\r\x1b[2K{} files, {} dirs, {}  {}",
                    format_count(files_found),
                    format_count(dirs_found),
                    format_size(total_size),
                    current_path.display()
                );
                let _ = stderr.flush();
                last_draw = Some(Instant::now());
            }
            ScanEvent::Completed { tree, duration } => {
                clear_progress(show_progress);
                return Ok((tree, duration));
            }
            ScanEvent::Error { message } => {
                clear_progress(show_progress);
                bail!(message);
            }
        }
    }
    bail!("scan ended without a result")
}

fn clear_progress(shown: bool) {
    if shown {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "\r\x1b[2K");
        let _ = stderr.flush();
    }
}

fn write_summary(
    out: &mut impl Write,
    tree: &FileTree,
    root: NodeIndex,
    duration: Duration,
    cli: &Cli,
) -> io::Result<()> {
    let metric = cli.metric();
    let root_node = tree.node(root);

    writeln!(out, "Scanned {} in {:.2?}", cli.path.display(), duration)?;
    writeln!(
        out,
        "  {} files, {} directories, {} ({})",
        format_count(root_node.file_count),
        format_count(root_node.directory_count),
        format_size(metric.of(root_node)),
        metric.label()
    )?;

    let children = tree.children(root);
    if !children.is_empty() {
        writeln!(out, "\nLargest entries:")?;
        let mut ranked = children;
        ranked.sort_by_key(|&c| std::cmp::Reverse(metric.of(tree.node(c))));
        for child in ranked.into_iter().take(cli.top) {
            let node = tree.node(child);
            let suffix = if node.is_dir { "/" } else { "" };
            writeln!(
                out,
                "  {:>5.1}%  {:>10}  {}{}",
                tree.percent_of_parent(child, metric),
                format_size(metric.of(node)),
                node.name,
                suffix
            )?;
        }
    }

    let categories = category_breakdown(tree, root);
    if !categories.is_empty() {
        writeln!(out, "\nBy type:")?;
        for stats in &categories {
            writeln!(
                out,
                "  {:<13} {:>10}  {} files",
                stats.category.label(),
                format_size(stats.total_size),
                format_count(stats.file_count)
            )?;
        }
    }

    let largest = top_files(tree, cli.top);
    if !largest.is_empty() {
        writeln!(out, "\nLargest files:")?;
        for file in &largest {
            writeln!(out, "  {:>10}  {}", format_size(file.size), file.path.display())?;
        }
    }
    Ok(())
}

fn write_treemap_report(
    out: &mut impl Write,
    tree: &FileTree,
    items: &[TreemapItem],
    viewport: Rect,
    hit: Option<Point>,
) -> io::Result<()> {
    let levels = items.iter().map(|i| i.depth + 1).max().unwrap_or(0);
    writeln!(
        out,
        "\nTreemap: {} cells in {}x{}, {} levels deep",
        items.len(),
        viewport.width,
        viewport.height,
        levels
    )?;

    if let Some(point) = hit {
        match hit_test(items, point) {
            Some(item) => writeln!(
                out,
                "  at ({}, {}): {}",
                point.x,
                point.y,
                tree.full_path(item.node).display()
            )?,
            None => writeln!(out, "  at ({}, {}): nothing", point.x, point.y)?,
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CellReport<'a> {
    id: usize,
    path: String,
    depth: usize,
    size: u64,
    is_dir: bool,
    rect: &'a Rect,
    color: String,
}

#[derive(Serialize)]
struct TreemapReport<'a> {
    cells: Vec<CellReport<'a>>,
    hit: Option<usize>,
}

fn write_cells_json(
    out: &mut impl Write,
    tree: &FileTree,
    items: &[TreemapItem],
    hit: Option<Point>,
    metric: SizeMetric,
) -> Result<()> {
    let cells = items
        .iter()
        .map(|item| {
            let node = tree.node(item.node);
            CellReport {
                id: item.id,
                path: tree.full_path(item.node).to_string_lossy().into_owned(),
                depth: item.depth,
                size: metric.of(node),
                is_dir: node.is_dir,
                rect: &item.rect,
                color: item.color.to_hex(),
            }
        })
        .collect();
    let report = TreemapReport {
        cells,
        hit: hit.and_then(|p| hit_test(items, p)).map(|item| item.id),
    };
    serde_json::to_writer_pretty(&mut *out, &report).context("writing treemap JSON")?;
    writeln!(out)?;
    Ok(())
}
