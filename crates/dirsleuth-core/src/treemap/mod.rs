/// Treemap layout, hit testing and drill-down navigation.
///
/// Everything here is pure and synchronous: a layout is a function of the
/// tree, the node being shown, the bounds and the [`LayoutOptions`]. Callers
/// that re-layout on resize keep only the most recent result.
///
/// [`LayoutOptions`]: crate::config::LayoutOptions
pub mod color;
pub mod geometry;
pub mod hit_test;
pub mod layout;
pub mod navigation;

pub use color::{depth_shade, Rgb};
pub use geometry::{Point, Rect};
pub use hit_test::hit_test;
pub use layout::{layout, squarify, TreemapItem};
pub use navigation::{Navigator, MAX_NAV_HISTORY};
