/// Squarified treemap layout (Bruls, Huizing, van Wijk).
///
/// Rectangle areas are proportional to subtree size under the chosen
/// [`SizeMetric`](crate::model::SizeMetric). Directories are emitted first as
/// a background cell covering their whole rectangle, then their children are
/// laid out inside it, depth-first. The output is a flat, pre-ordered list of
/// [`TreemapItem`]s; it is the only thing rendering and hit testing see, and
/// it is rebuilt wholesale on every layout.
use super::color::{depth_shade, Rgb};
use super::geometry::Rect;
use crate::config::LayoutOptions;
use crate::model::{FileTree, NodeIndex};
use serde::Serialize;

/// Areas at or below this are treated as empty.
const AREA_EPSILON: f64 = 1e-9;

/// One positioned, coloured cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapItem {
    /// Sequential, in emission order. Unique within one layout pass only.
    pub id: usize,
    pub node: NodeIndex,
    pub rect: Rect,
    /// 0 for the node the layout was requested for.
    pub depth: usize,
    pub color: Rgb,
}

/// Lay out the subtree under `node` inside `bounds`.
///
/// Deterministic: identical inputs produce identical items, ids and order.
/// A zero- or negative-area `bounds` produces no items at all.
pub fn layout(
    tree: &FileTree,
    node: NodeIndex,
    bounds: Rect,
    options: &LayoutOptions,
) -> Vec<TreemapItem> {
    let mut pass = LayoutPass {
        tree,
        options,
        items: Vec::with_capacity(1024),
    };
    pass.layout_node(node, bounds, 0);
    pass.items
}

struct LayoutPass<'a> {
    tree: &'a FileTree,
    options: &'a LayoutOptions,
    items: Vec<TreemapItem>,
}

impl LayoutPass<'_> {
    fn layout_node(&mut self, idx: NodeIndex, bounds: Rect, depth: usize) {
        let area = bounds.area();
        if area.is_nan() || area <= 0.0 {
            return;
        }

        let tree = self.tree;
        let node = tree.node(idx);
        let recurse = node.is_dir
            && node.first_child.is_some()
            && depth < self.options.max_depth
            && area >= self.options.min_pixel_area;
        if !recurse {
            self.push(idx, bounds, depth);
            return;
        }

        let metric = self.options.metric;
        let children: Vec<(NodeIndex, u64)> = tree
            .children(idx)
            .into_iter()
            .filter_map(|c| {
                let size = metric.of(tree.node(c));
                (size > 0).then_some((c, size))
            })
            .collect();

        // Background first, so gaps between children show the directory.
        self.push(idx, bounds, depth);
        if children.is_empty() {
            return;
        }

        let total: f64 = children.iter().map(|&(_, size)| size as f64).sum();
        let areas: Vec<f64> = children
            .iter()
            .map(|&(_, size)| size as f64 / total * area)
            .collect();

        let rects = squarify(&areas, bounds);
        for (&(child, _), rect) in children.iter().zip(rects) {
            self.layout_node(child, rect, depth + 1);
        }
    }

    fn push(&mut self, idx: NodeIndex, rect: Rect, depth: usize) {
        let node = self.tree.node(idx);
        self.items.push(TreemapItem {
            id: self.items.len(),
            node: idx,
            rect,
            depth,
            color: depth_shade(node.category.color(), depth),
        });
    }
}

/// Partition `bounds` into one rectangle per entry of `areas`, in order.
///
/// `areas` should already sum to `bounds.area()`. Rows are grown greedily
/// along the short side of the free rectangle while the worst aspect ratio
/// in the row does not get worse, then laid along the free rectangle's
/// longer axis and cut off it.
pub fn squarify(areas: &[f64], bounds: Rect) -> Vec<Rect> {
    let mut rects = vec![Rect::default(); areas.len()];
    let mut remaining = bounds;
    let mut start = 0;

    while start < areas.len() {
        let short_side = remaining.short_side();

        let mut end = start + 1;
        let mut row_area = areas[start];
        let mut best = worst_ratio(&areas[start..end], row_area, short_side);
        while end < areas.len() {
            let grown_area = row_area + areas[end];
            let grown = worst_ratio(&areas[start..=end], grown_area, short_side);
            if grown > best {
                break;
            }
            best = grown;
            row_area = grown_area;
            end += 1;
        }

        let free_area = remaining.area();
        let fraction = if free_area > AREA_EPSILON {
            (row_area / free_area).min(1.0)
        } else {
            0.0
        };
        let share = |i: usize| {
            if row_area > AREA_EPSILON {
                areas[i] / row_area
            } else {
                0.0
            }
        };

        if remaining.width >= remaining.height {
            // Column on the left edge, items stacked top to bottom.
            let row_width = remaining.width * fraction;
            let mut y = remaining.y;
            for (i, rect) in rects.iter_mut().enumerate().take(end).skip(start) {
                let h = share(i) * remaining.height;
                *rect = Rect::new(remaining.x, y, row_width, h);
                y += h;
            }
            remaining = Rect::new(
                remaining.x + row_width,
                remaining.y,
                remaining.width - row_width,
                remaining.height,
            );
        } else {
            // Strip along the top edge, items left to right.
            let row_height = remaining.height * fraction;
            let mut x = remaining.x;
            for (i, rect) in rects.iter_mut().enumerate().take(end).skip(start) {
                let w = share(i) * remaining.width;
                *rect = Rect::new(x, remaining.y, w, row_height);
                x += w;
            }
            remaining = Rect::new(
                remaining.x,
                remaining.y + row_height,
                remaining.width,
                remaining.height - row_height,
            );
        }

        start = end;
    }

    rects
}

/// Worst width:height ratio among the cells of a row of total `row_area`
/// laid against a side of length `side`.
fn worst_ratio(row: &[f64], row_area: f64, side: f64) -> f64 {
    if side <= 0.0 || row_area <= AREA_EPSILON {
        return f64::INFINITY;
    }
    let side_sq = side * side;
    let area_sq = row_area * row_area;
    row.iter()
        .filter(|&&a| a > 0.0)
        .map(|&a| ((side_sq * a) / area_sq).max(area_sq / (side_sq * a)))
        .fold(0.0, f64::max)
}
