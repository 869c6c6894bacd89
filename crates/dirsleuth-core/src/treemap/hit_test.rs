/// Point → item resolution over a layout's flat item list.
use super::geometry::Point;
use super::layout::TreemapItem;

/// Return the topmost item containing `point`.
///
/// Items are scanned in reverse emission order, so a child cell (emitted
/// after its directory's background) wins over the background it sits on.
/// Bounds are inclusive. O(n) per query.
pub fn hit_test(items: &[TreemapItem], point: Point) -> Option<&TreemapItem> {
    items.iter().rev().find(|item| item.rect.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeIndex;
    use crate::treemap::color::Rgb;
    use crate::treemap::geometry::Rect;

    fn item(id: usize, rect: Rect) -> TreemapItem {
        TreemapItem {
            id,
            node: NodeIndex(id as u32),
            rect,
            depth: id,
            color: Rgb::new(0, 0, 0),
        }
    }

    #[test]
    fn later_item_wins_on_overlap() {
        let items = vec![
            item(0, Rect::new(0.0, 0.0, 10.0, 10.0)),
            item(1, Rect::new(0.0, 0.0, 5.0, 5.0)),
        ];
        assert_eq!(hit_test(&items, Point::new(5.0, 5.0)).map(|i| i.id), Some(1));
        assert_eq!(hit_test(&items, Point::new(8.0, 8.0)).map(|i| i.id), Some(0));
    }

    #[test]
    fn miss_returns_none() {
        let items = vec![item(0, Rect::new(0.0, 0.0, 10.0, 10.0))];
        assert!(hit_test(&items, Point::new(10.5, 3.0)).is_none());
        assert!(hit_test(&[], Point::new(0.0, 0.0)).is_none());
    }
}
