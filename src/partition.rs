//! The partition algorithm: cover the region with interior-disjoint
//! rectangles, keeping their number small.
//!
//! This is the classical construction for rectilinear polygons: *good
//! diagonals* (axis-parallel segments joining two concave vertices through
//! the interior) can resolve two concave vertices with a single cut, so a
//! maximum independent set of non-crossing good diagonals is chosen first;
//! every remaining concave vertex then gets one arbitrary inward cut. The
//! cells of the resulting subdivision are the partition.

use std::collections::{BTreeMap, BTreeSet};

use crate::arrangement::rectangular_faces;
use crate::geom::{Coord, Dir, Point, Segment};
use crate::matching::Bipartite;
use crate::polygon::{
    concave_vertices, ray_segment_intersection, ConcaveMap, PolygonWithHoles, RayHit,
};
use crate::Cover;

/// Partition `polygon` into rectangles.
pub(crate) fn partition_cover(polygon: &PolygonWithHoles) -> Cover {
    let concave = concave_vertices(polygon);
    let mut handled: BTreeSet<Point> = BTreeSet::new();

    let good_diagonals = find_good_diagonals(polygon, &concave);
    let crossing_pairs = find_crossing_pairs(&good_diagonals);
    let mut cuts = pick_independent_diagonals(&crossing_pairs, &mut handled);

    // Good diagonals that cross nothing are always usable.
    let crossing: BTreeSet<Segment> = crossing_pairs
        .iter()
        .flat_map(|&(v, h)| [v, h])
        .collect();
    for &diagonal in &good_diagonals {
        if !crossing.contains(&diagonal) {
            cuts.push(diagonal);
            handled.insert(diagonal.start);
            handled.insert(diagonal.end);
        }
    }

    for (&vertex, dirs) in &concave {
        if !handled.contains(&vertex) {
            let cut = pick_cut(polygon, vertex, dirs[0], &cuts);
            handled.insert(vertex);
            cuts.push(cut);
        }
    }

    rectangular_faces(polygon, &cuts)
}

/// All good diagonals: vertical ones first, then horizontal ones.
fn find_good_diagonals(polygon: &PolygonWithHoles, concave: &ConcaveMap) -> Vec<Segment> {
    let mut by_x: BTreeMap<Coord, Vec<Coord>> = BTreeMap::new();
    let mut by_y: BTreeMap<Coord, Vec<Coord>> = BTreeMap::new();
    for vertex in concave.keys() {
        by_x.entry(vertex.x).or_default().push(vertex.y);
        by_y.entry(vertex.y).or_default().push(vertex.x);
    }
    for coords in by_x.values_mut().chain(by_y.values_mut()) {
        coords.sort_unstable();
    }

    let mut diagonals = Vec::new();
    scan_aligned(polygon, Dir::Up, &by_x, concave, &mut diagonals);
    scan_aligned(polygon, Dir::Right, &by_y, concave, &mut diagonals);
    diagonals
}

/// Scan buckets of aligned concave vertices for good diagonals.
///
/// Within a bucket only adjacent vertex pairs can form a diagonal. A pair
/// qualifies when the lower vertex opens toward `positive` and the upper one
/// toward its reverse; after any attempted pair the scan advances by two,
/// because the upper vertex of an attempted pair opens negatively and so
/// cannot open positively toward the vertex after it.
fn scan_aligned(
    polygon: &PolygonWithHoles,
    positive: Dir,
    aligned: &BTreeMap<Coord, Vec<Coord>>,
    concave: &ConcaveMap,
    diagonals: &mut Vec<Segment>,
) {
    let negative = positive.reverse();
    let horizontal = positive == Dir::Right;
    let at = |fixed: Coord, var: Coord| {
        if horizontal {
            Point::new(var, fixed)
        } else {
            Point::new(fixed, var)
        }
    };

    for (&fixed, vars) in aligned {
        if vars.len() <= 1 {
            continue;
        }
        let mut i = 0;
        while i + 1 < vars.len() {
            let p = at(fixed, vars[i]);
            if !concave[&p].contains(&positive) {
                i += 1;
                continue;
            }
            let q = at(fixed, vars[i + 1]);
            if !concave[&q].contains(&negative) {
                i += 1;
                continue;
            }
            let candidate = Segment::new(p, q);
            if is_good_diagonal(&candidate, polygon) {
                diagonals.push(candidate);
            }
            i += 1;
            if i + 1 < vars.len() {
                i += 1;
            }
        }
    }
}

/// A candidate is good when no boundary edge passes through its interior;
/// collinear overlap counts as passing through.
fn is_good_diagonal(candidate: &Segment, polygon: &PolygonWithHoles) -> bool {
    polygon
        .edges()
        .all(|edge| !crosses_interior(&edge, candidate))
}

/// Do the two segments share more than isolated endpoints of `b`?
///
/// For parallel segments this checks for an overlap of positive length, for
/// perpendicular ones a crossing strictly inside both.
fn crosses_interior(a: &Segment, b: &Segment) -> bool {
    match (a.is_vertical(), b.is_vertical()) {
        (true, true) => {
            a.start.x == b.start.x && a.min_y() < b.max_y() && b.min_y() < a.max_y()
        }
        (false, false) => {
            a.start.y == b.start.y && a.min_x() < b.max_x() && b.min_x() < a.max_x()
        }
        _ => {
            let (h, v) = if a.is_vertical() { (b, a) } else { (a, b) };
            v.min_y() < h.start.y
                && h.start.y < v.max_y()
                && h.min_x() < v.start.x
                && v.start.x < h.max_x()
        }
    }
}

/// Pairs of (vertical, horizontal) good diagonals that touch or cross.
fn find_crossing_pairs(diagonals: &[Segment]) -> Vec<(Segment, Segment)> {
    let verticals: Vec<Segment> = diagonals.iter().filter(|d| d.is_vertical()).copied().collect();
    let horizontals: Vec<Segment> = diagonals
        .iter()
        .filter(|d| d.is_horizontal())
        .copied()
        .collect();

    let mut pairs = Vec::new();
    for &v in &verticals {
        for &h in &horizontals {
            let meet = h.min_x() <= v.start.x
                && v.start.x <= h.max_x()
                && v.min_y() <= h.start.y
                && h.start.y <= v.max_y();
            if meet {
                pairs.push((v, h));
            }
        }
    }
    pairs
}

/// From the crossing pairs, keep a maximum set of pairwise non-crossing
/// diagonals; their endpoints count as handled.
fn pick_independent_diagonals(
    crossing_pairs: &[(Segment, Segment)],
    handled: &mut BTreeSet<Point>,
) -> Vec<Segment> {
    if crossing_pairs.is_empty() {
        return Vec::new();
    }

    let mut verticals: Vec<Segment> = Vec::new();
    let mut horizontals: Vec<Segment> = Vec::new();
    let mut vertical_ids: BTreeMap<Segment, usize> = BTreeMap::new();
    let mut horizontal_ids: BTreeMap<Segment, usize> = BTreeMap::new();
    for &(v, h) in crossing_pairs {
        vertical_ids.entry(v).or_insert_with(|| {
            verticals.push(v);
            verticals.len() - 1
        });
        horizontal_ids.entry(h).or_insert_with(|| {
            horizontals.push(h);
            horizontals.len() - 1
        });
    }

    let mut graph = Bipartite::new(verticals.len(), horizontals.len());
    for (v, h) in crossing_pairs {
        graph.add_edge(vertical_ids[v], horizontal_ids[h]);
    }
    let (keep_vertical, keep_horizontal) = graph.max_independent_set();

    let mut kept = Vec::new();
    for (i, &v) in verticals.iter().enumerate() {
        if keep_vertical[i] {
            kept.push(v);
            handled.insert(v.start);
            handled.insert(v.end);
        }
    }
    for (i, &h) in horizontals.iter().enumerate() {
        if keep_horizontal[i] {
            kept.push(h);
            handled.insert(h.start);
            handled.insert(h.end);
        }
    }
    kept
}

/// An arbitrary inward cut for a concave vertex none of the diagonals
/// resolved: a ray along the vertex's first open direction, stopped at the
/// nearest boundary edge or earlier cut.
fn pick_cut(
    polygon: &PolygonWithHoles,
    vertex: Point,
    dir: Dir,
    previous_cuts: &[Segment],
) -> Segment {
    let mut hits: BTreeSet<Point> = BTreeSet::new();
    for segment in polygon.edges().chain(previous_cuts.iter().copied()) {
        if let RayHit::At(p) = ray_segment_intersection(vertex, dir, &segment) {
            hits.insert(p);
        }
    }
    // The ray grazes the vertex's own edges at their shared endpoint.
    hits.remove(&vertex);

    let target = if dir.is_positive() {
        hits.iter().next().copied()
    } else {
        hits.iter().next_back().copied()
    };
    match target {
        Some(target) => Segment::new(vertex, target),
        None => unreachable!("an inward ray always meets the boundary"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;
    use crate::polygon::Ring;

    fn poly(outer: &[(Coord, Coord)], holes: &[&[(Coord, Coord)]]) -> PolygonWithHoles {
        let ring = |pts: &[(Coord, Coord)]| {
            Ring::new(pts.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
        };
        PolygonWithHoles::new(ring(outer), holes.iter().map(|h| ring(h)).collect()).unwrap()
    }

    #[test]
    fn l_shape_partitions_into_two() {
        let p = poly(&[(0, 0), (10, 0), (10, 4), (4, 4), (4, 10), (0, 10)], &[]);
        let cover = partition_cover(&p);
        assert_eq!(cover.len(), 2);
        let total: u64 = cover.iter().map(Rect::area).sum();
        assert_eq!(total, p.area());
        insta::assert_snapshot!(
            format!("{cover:?}"),
            @"[(0, 0) -- (10, 4), (0, 4) -- (4, 10)]"
        );
    }

    #[test]
    fn plus_shape_uses_the_middle_diagonals() {
        // The four good diagonals around the centre all cross each other;
        // the matching keeps the two horizontal ones, which resolve every
        // concave vertex at once.
        let p = poly(
            &[
                (1, 0),
                (2, 0),
                (2, 1),
                (3, 1),
                (3, 2),
                (2, 2),
                (2, 3),
                (1, 3),
                (1, 2),
                (0, 2),
                (0, 1),
                (1, 1),
            ],
            &[],
        );
        let cover = partition_cover(&p);
        let total: u64 = cover.iter().map(Rect::area).sum();
        assert_eq!(total, p.area());
        // An optimal partition of the plus has three rectangles.
        assert_eq!(cover.len(), 3);
        for (i, a) in cover.iter().enumerate() {
            for b in &cover[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn square_with_hole_partitions_into_four() {
        let p = poly(
            &[(0, 0), (6, 0), (6, 6), (0, 6)],
            &[&[(2, 2), (4, 2), (4, 4), (2, 4)]],
        );
        let cover = partition_cover(&p);
        assert_eq!(cover.len(), 4);
        let total: u64 = cover.iter().map(Rect::area).sum();
        assert_eq!(total, 32);
    }

    #[test]
    fn good_diagonal_validity_respects_edges() {
        // Notches above and below produce two pairs of vertically aligned,
        // mutually open concave vertices; a hole blocks the left candidate
        // but not the right one.
        let p = poly(
            &[
                (0, 0),
                (2, 0),
                (2, 2),
                (6, 2),
                (6, 0),
                (12, 0),
                (12, 12),
                (6, 12),
                (6, 10),
                (2, 10),
                (2, 12),
                (0, 12),
            ],
            &[&[(1, 5), (4, 5), (4, 6), (1, 6)]],
        );
        let concave = concave_vertices(&p);
        let diagonals = find_good_diagonals(&p, &concave);
        assert_eq!(
            diagonals,
            vec![Segment::new(Point::new(6, 2), Point::new(6, 10))]
        );
    }
}
