//! Utilities for generating examples, benchmarks, and test cases.

use crate::geom::{Coord, Point, Rect};
use crate::polygon::{PolygonWithHoles, Ring};

/// Generate a monotone staircase polygon.
///
/// Starting at the origin, each `(width, height)` step extends the boundary
/// to the right and then up; the staircase is closed with a straight top
/// edge and a straight left edge. For `steps = [(2, 1), (1, 2)]` it looks
/// like:
///
/// ```text
/// ┌─────┐
/// │     │
/// │  ┌──┘
/// └──┘
/// ```
///
/// A single step yields a plain rectangle.
pub fn staircase(steps: &[(u32, u32)]) -> PolygonWithHoles {
    assert!(!steps.is_empty());

    let mut points = vec![Point::new(0, 0)];
    let (mut x, mut y) = (0 as Coord, 0 as Coord);
    for &(width, height) in steps {
        x += width as Coord;
        points.push(Point::new(x, y));
        y += height as Coord;
        points.push(Point::new(x, y));
    }
    points.push(Point::new(0, y));

    match Ring::new(points).and_then(PolygonWithHoles::simple) {
        Ok(polygon) => polygon,
        Err(err) => panic!("staircases are always valid: {err}"),
    }
}

/// Generate a square with one rectangular hole.
///
/// The square spans `(0, 0)` to `(size, size)`; `hole` must be strictly
/// inside it.
pub fn frame(size: Coord, hole: Rect) -> PolygonWithHoles {
    assert!(hole.min_x() > 0 && hole.min_y() > 0 && hole.max_x() < size && hole.max_y() < size);

    let outer = vec![
        Point::new(0, 0),
        Point::new(size, 0),
        Point::new(size, size),
        Point::new(0, size),
    ];
    let hole_ring = vec![
        hole.bottom_left(),
        hole.bottom_right(),
        hole.top_right(),
        hole.top_left(),
    ];
    let build = || -> Result<PolygonWithHoles, crate::Error> {
        PolygonWithHoles::new(Ring::new(outer)?, vec![Ring::new(hole_ring)?])
    };
    match build() {
        Ok(polygon) => polygon,
        Err(err) => panic!("frames are always valid: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staircase_area_matches_steps() {
        // Column i has height = sum of step heights from i on.
        let p = staircase(&[(2, 1), (1, 2)]);
        assert_eq!(p.area(), 2 * 3 + 1 * 2);
        assert_eq!(p.outer().len(), 6);
    }

    #[test]
    fn frame_has_one_hole() {
        let p = frame(6, Rect::from_coords(2, 2, 4, 4));
        assert_eq!(p.holes().len(), 1);
        assert_eq!(p.area(), 32);
    }
}
