use qplace_common::db::core::Design;

/// Clamps every movable node's bounding box into the core rectangle. This is
/// the only legalization step the system performs; row assignment, site
/// snapping, and overlap removal are left to a downstream legalizer.
///
/// Idempotent: applying this twice to the same `Design` yields the same
/// positions as applying it once, since the clamp is a pure function of the
/// node's current position and the (unchanging) core rectangle.
pub fn clip(design: &mut Design) {
    let core = design.core;
    for i in 0..design.movable_index.len() {
        let cell = design.movable_index[i];
        let node = &mut design.nodes[cell.index()];

        let min_x = core.min.x;
        let max_x = core.max.x - node.width;
        if max_x < min_x {
            log::warn!(
                "cell-exceeds-core: node '{}' width {} exceeds core span {}",
                node.name,
                node.width,
                core.width()
            );
            node.x = min_x;
        } else {
            node.x = node.x.clamp(min_x, max_x);
        }

        let min_y = core.min.y;
        let max_y = core.max.y - node.height;
        if max_y < min_y {
            log::warn!(
                "cell-exceeds-core: node '{}' height {} exceeds core span {}",
                node.name,
                node.height,
                core.height()
            );
            node.y = min_y;
        } else {
            node.y = node.y.clamp(min_y, max_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qplace_common::geom::point::Point;
    use qplace_common::geom::rect::Rect;

    /// Core width 5, movable cell width 10: clipper pins x to core.min_x.
    #[test]
    fn cell_exceeds_core_pins_to_boundary() {
        let mut design = Design::new();
        design.add_node("big".into(), 10.0, 1.0, false);
        design.reindex_movable();
        design.core = Rect::new(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        design.nodes[0].x = 2.0;

        clip(&mut design);
        assert_eq!(design.nodes[0].x, 0.0);
    }

    #[test]
    fn clipping_is_idempotent() {
        let mut design = Design::new();
        design.add_node("a".into(), 2.0, 2.0, false);
        design.reindex_movable();
        design.core = Rect::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        design.nodes[0].x = 15.0;
        design.nodes[0].y = -3.0;

        clip(&mut design);
        let (x1, y1) = (design.nodes[0].x, design.nodes[0].y);
        clip(&mut design);
        let (x2, y2) = (design.nodes[0].x, design.nodes[0].y);

        assert_eq!(x1, x2);
        assert_eq!(y1, y2);
        assert!(x1 <= 10.0 - 2.0 && x1 >= 0.0);
    }
}
