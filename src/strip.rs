//! The strip algorithm: cover the region with maximal horizontal strips.

use std::collections::BTreeSet;

use crate::geom::Rect;
use crate::polygon::PolygonWithHoles;
use crate::provider::RuntimeState;
use crate::Cover;

/// Cover `polygon` with maximal horizontal strips.
///
/// For every cell with no neighbour above, a strip is grown left and right
/// at that cell's height: neighbours keep being absorbed while their columns
/// are at least as tall. The strip then spans from the bottom-left cell of
/// the leftmost column to the top-right corner of the rightmost one.
/// Different starting cells can produce the same strip, so the result is
/// deduplicated through an ordered set and comes out sorted.
pub(crate) fn strip_cover(polygon: &PolygonWithHoles, state: &mut RuntimeState) -> Cover {
    state.ensure_graph(polygon);
    let graph = &state.graph;
    let cells = graph.cells();
    let heights = graph.heights();

    let mut cover = BTreeSet::new();
    for (i, cell) in cells.iter() {
        if cell.top.is_some() {
            continue;
        }
        let h = heights[i];
        let mut left = i;
        while let Some(l) = cells[left].left {
            if heights[l] < h {
                break;
            }
            left = l;
        }
        let mut right = i;
        while let Some(r) = cells[right].right {
            if heights[r] < h {
                break;
            }
            right = r;
        }
        let mut bottom_left = left;
        for _ in 0..h {
            bottom_left = match cells[bottom_left].bottom {
                Some(b) => b,
                None => unreachable!("column shorter than its height"),
            };
        }
        cover.insert(Rect::new(
            cells[bottom_left].rect.bottom_left(),
            cells[right].rect.top_right(),
        ));
    }
    cover.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Coord, Point};
    use crate::polygon::Ring;

    fn poly(outer: &[(Coord, Coord)]) -> PolygonWithHoles {
        let ring = Ring::new(outer.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap();
        PolygonWithHoles::simple(ring).unwrap()
    }

    #[test]
    fn l_shape_gets_two_strips() {
        let p = poly(&[(0, 0), (10, 0), (10, 4), (4, 4), (4, 10), (0, 10)]);
        let cover = strip_cover(&p, &mut RuntimeState::new());
        insta::assert_snapshot!(
            format!("{cover:?}"),
            @"[(0, 0) -- (4, 10), (0, 0) -- (10, 4)]"
        );
    }

    #[test]
    fn staircase_strips_cover_every_cell() {
        let p = poly(&[(0, 0), (6, 0), (6, 2), (4, 2), (4, 4), (2, 4), (2, 6), (0, 6)]);
        let mut state = RuntimeState::new();
        let cover = strip_cover(&p, &mut state);
        assert!(crate::verify_by_union(&cover, &p));
    }
}
