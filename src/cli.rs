//! Command-line arguments.

use clap::Parser;
use dirsleuth_core::config::DEFAULT_MAX_DEPTH;
use dirsleuth_core::treemap::{Point, Rect};
use dirsleuth_core::SizeMetric;
use std::path::PathBuf;

/// DirSleuth - see where your disk space went
#[derive(Parser, Debug)]
#[command(name = "dirsleuth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan
    pub path: PathBuf,

    /// Measure allocated (on-disk) size instead of logical size
    #[arg(long)]
    pub allocated: bool,

    /// Number of entries in each summary list
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Maximum treemap nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub depth: usize,

    /// Worker threads for scanning (defaults to one per CPU)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Lay out a treemap for a WIDTHxHEIGHT viewport
    #[arg(long, value_name = "WxH", value_parser = parse_viewport)]
    pub treemap: Option<Rect>,

    /// Report the treemap cell under X,Y
    #[arg(long, value_name = "X,Y", value_parser = parse_point, requires = "treemap")]
    pub hit: Option<Point>,

    /// Print treemap cells as JSON instead of the text summary
    #[arg(long, requires = "treemap")]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn metric(&self) -> SizeMetric {
        if self.allocated {
            SizeMetric::Allocated
        } else {
            SizeMetric::Logical
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

fn parse_viewport(s: &str) -> Result<Rect, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = parse_dimension(w)?;
    let height = parse_dimension(h)?;
    if width <= 0.0 || height <= 0.0 {
        return Err("viewport dimensions must be positive".into());
    }
    Ok(Rect::from_size(width, height))
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    Ok(Point::new(parse_dimension(x)?, parse_dimension(y)?))
}

fn parse_dimension(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{s}' is not a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn viewport_parsing() {
        assert_eq!(parse_viewport("1280x800"), Ok(Rect::from_size(1280.0, 800.0)));
        assert_eq!(parse_viewport("10X5.5"), Ok(Rect::from_size(10.0, 5.5)));
        assert!(parse_viewport("1280").is_err());
        assert!(parse_viewport("0x10").is_err());
        assert!(parse_viewport("axb").is_err());
    }

    #[test]
    fn point_parsing() {
        assert_eq!(parse_point("5, 7.5"), Ok(Point::new(5.0, 7.5)));
        assert!(parse_point("5").is_err());
        assert!(parse_point("inf,1").is_err());
    }

    #[test]
    fn hit_requires_treemap() {
        assert!(Cli::try_parse_from(["dirsleuth", "/tmp", "--hit", "1,1"]).is_err());
        let cli =
            Cli::try_parse_from(["dirsleuth", "/tmp", "--treemap", "10x10", "--hit", "1,1", "-vv"])
                .unwrap();
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        assert_eq!(cli.metric(), SizeMetric::Logical);
    }
}
