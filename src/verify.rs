//! Exact cover verification.
//!
//! Both checks reduce to interval arithmetic over a vertical slab
//! decomposition of the polygon: between two consecutive vertex
//! `x`-coordinates, the region is a union of `y`-intervals delimited by the
//! horizontal edges spanning that slab. Everything stays in integers, so
//! the verdicts are exact.

use std::collections::BTreeSet;

use crate::geom::{Coord, Rect};
use crate::polygon::PolygonWithHoles;

/// The vertical slab decomposition of a polygon.
struct Slabs {
    xs: Vec<Coord>,
    /// Covered `y`-intervals per slab, bottom to top.
    intervals: Vec<Vec<(Coord, Coord)>>,
}

impl Slabs {
    fn new(polygon: &PolygonWithHoles) -> Slabs {
        let xs: Vec<Coord> = polygon
            .edges()
            .flat_map(|e| [e.start.x, e.end.x])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut intervals = Vec::with_capacity(xs.len().saturating_sub(1));
        for window in xs.windows(2) {
            let (x1, x2) = (window[0], window[1]);
            // Inside a slab only the horizontal edges spanning it cross;
            // sorted, they alternate between entering and leaving the
            // region.
            let mut ys: Vec<Coord> = polygon
                .edges()
                .filter(|e| e.is_horizontal() && e.min_x() <= x1 && e.max_x() >= x2)
                .map(|e| e.start.y)
                .collect();
            ys.sort_unstable();
            debug_assert!(ys.len() % 2 == 0);
            intervals.push(ys.chunks(2).map(|pair| (pair[0], pair[1])).collect());
        }
        Slabs { xs, intervals }
    }

    /// The region as a list of interior-disjoint rectangles.
    fn cells(&self) -> Vec<Rect> {
        let mut cells = Vec::new();
        for (i, window) in self.xs.windows(2).enumerate() {
            for &(lo, hi) in &self.intervals[i] {
                cells.push(Rect::from_coords(window[0], lo, window[1], hi));
            }
        }
        cells
    }

    /// Is `rect` entirely inside the region?
    fn contains_rect(&self, rect: &Rect) -> bool {
        match (self.xs.first(), self.xs.last()) {
            (Some(&first), Some(&last)) => {
                if rect.min_x() < first || rect.max_x() > last {
                    return false;
                }
            }
            _ => return false,
        }
        for (i, window) in self.xs.windows(2).enumerate() {
            if window[0] >= rect.max_x() || window[1] <= rect.min_x() {
                continue;
            }
            let spanned = self.intervals[i]
                .iter()
                .any(|&(lo, hi)| lo <= rect.min_y() && rect.max_y() <= hi);
            if !spanned {
                return false;
            }
        }
        true
    }
}

/// The area of the union of `rects`, counting overlaps once.
fn union_area(rects: &[Rect]) -> u64 {
    let xs: Vec<Coord> = rects
        .iter()
        .flat_map(|r| [r.min_x(), r.max_x()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut area = 0u64;
    for window in xs.windows(2) {
        let (x1, x2) = (window[0], window[1]);
        let mut ys: Vec<(Coord, Coord)> = rects
            .iter()
            .filter(|r| r.min_x() <= x1 && r.max_x() >= x2)
            .map(|r| (r.min_y(), r.max_y()))
            .collect();
        ys.sort_unstable();
        let mut covered = 0u64;
        let mut current: Option<(Coord, Coord)> = None;
        for (lo, hi) in ys {
            current = match current {
                None => Some((lo, hi)),
                Some((clo, chi)) if lo <= chi => Some((clo, chi.max(hi))),
                Some((clo, chi)) => {
                    covered += (chi - clo) as u64;
                    Some((lo, hi))
                }
            };
        }
        if let Some((clo, chi)) = current {
            covered += (chi - clo) as u64;
        }
        area += covered * (x2 - x1) as u64;
    }
    area
}

/// Check a cover by comparing the union of its rectangles with the region.
///
/// Valid when every rectangle is non-degenerate and inside the region and
/// the union's area equals the region's area; together these are equivalent
/// to an empty symmetric difference.
pub fn verify_by_union(cover: &[Rect], polygon: &PolygonWithHoles) -> bool {
    let slabs = Slabs::new(polygon);
    for rect in cover {
        if rect.width() <= 0 || rect.height() <= 0 {
            return false;
        }
        if !slabs.contains_rect(rect) {
            return false;
        }
    }
    union_area(cover) == polygon.area()
}

/// Check a cover by subtracting its rectangles from the region.
///
/// The region starts as its slab cells; each rectangle (in sorted order)
/// must lie inside the region and is subtracted from every remaining
/// uncovered piece. Valid when nothing remains.
pub fn verify_by_subtraction(cover: &[Rect], polygon: &PolygonWithHoles) -> bool {
    let slabs = Slabs::new(polygon);
    let mut rects = cover.to_vec();
    rects.sort();

    let mut uncovered = slabs.cells();
    for rect in rects {
        if rect.width() <= 0 || rect.height() <= 0 {
            return false;
        }
        if !slabs.contains_rect(&rect) {
            return false;
        }
        let mut remaining = Vec::with_capacity(uncovered.len());
        for piece in uncovered {
            subtract_rect(piece, &rect, &mut remaining);
        }
        uncovered = remaining;
    }
    uncovered.is_empty()
}

/// Append the parts of `piece` outside `rect` to `out` (at most four).
fn subtract_rect(piece: Rect, rect: &Rect, out: &mut Vec<Rect>) {
    if !piece.intersects(rect) {
        out.push(piece);
        return;
    }
    if piece.min_x() < rect.min_x() {
        out.push(Rect::from_coords(
            piece.min_x(),
            piece.min_y(),
            rect.min_x(),
            piece.max_y(),
        ));
    }
    if piece.max_x() > rect.max_x() {
        out.push(Rect::from_coords(
            rect.max_x(),
            piece.min_y(),
            piece.max_x(),
            piece.max_y(),
        ));
    }
    let lo_x = piece.min_x().max(rect.min_x());
    let hi_x = piece.max_x().min(rect.max_x());
    if piece.min_y() < rect.min_y() {
        out.push(Rect::from_coords(lo_x, piece.min_y(), hi_x, rect.min_y()));
    }
    if piece.max_y() > rect.max_y() {
        out.push(Rect::from_coords(lo_x, rect.max_y(), hi_x, piece.max_y()));
    }
}
