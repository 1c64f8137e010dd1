//! Planar subdivision of axis-aligned segments, and extraction of its
//! rectangular faces.
//!
//! The covering algorithms cut a polygon along axis-aligned segments and
//! then need the cells of the resulting subdivision. Input segments may
//! cross, form T-junctions, or overlap collinearly; everything is integer
//! arithmetic, so the subdivision is exact.
//!
//! Faces are traced with the usual half-edge rule: from an incoming directed
//! edge, the face continues along the first outgoing direction clockwise
//! from the reversed incoming direction. Every bounded face is then walked
//! counterclockwise exactly once, and the unbounded face is the one cycle
//! with non-positive signed area.

use std::collections::{BTreeMap, BTreeSet};

use crate::geom::{Dir, Point, Rect, Segment};
use crate::polygon::PolygonWithHoles;

fn dir_slot(dir: Dir) -> usize {
    match dir {
        Dir::Right => 0,
        Dir::Up => 1,
        Dir::Left => 2,
        Dir::Down => 3,
    }
}

/// The rectangular faces of the subdivision induced by `polygon`'s boundary
/// edges together with `cuts`.
///
/// Faces with more than four direction changes are not rectangles and are
/// dropped, as are faces whose bounding box coincides with a hole (the
/// subdivision itself has no notion of holes).
pub(crate) fn rectangular_faces(polygon: &PolygonWithHoles, cuts: &[Segment]) -> Vec<Rect> {
    let segments: Vec<Segment> = polygon.edges().chain(cuts.iter().copied()).collect();
    let adjacency = build_adjacency(&segments);
    let hole_boxes: Vec<Rect> = polygon.holes().iter().map(|h| h.bbox()).collect();

    let mut faces = Vec::new();
    let mut visited: BTreeSet<(Point, Dir)> = BTreeSet::new();
    for (&vertex, slots) in &adjacency {
        for dir in [Dir::Right, Dir::Up, Dir::Left, Dir::Down] {
            if slots[dir_slot(dir)].is_none() || visited.contains(&(vertex, dir)) {
                continue;
            }
            let cycle = trace_face(&adjacency, vertex, dir, &mut visited);
            if signed_area2(&cycle) <= 0 {
                continue;
            }
            if direction_changes(&cycle) > 4 {
                continue;
            }
            let bbox = cycle_bbox(&cycle);
            if hole_boxes.contains(&bbox) {
                continue;
            }
            faces.push(bbox);
        }
    }
    faces
}

/// Split all segments at their mutual intersections and index the resulting
/// elementary edges by vertex and direction.
///
/// Vertical adjacency of the input (each vertex meets at most one edge per
/// direction after splitting) is what makes a single slot per direction
/// sufficient.
fn build_adjacency(segments: &[Segment]) -> BTreeMap<Point, [Option<Point>; 4]> {
    let mut elementary: BTreeSet<(Point, Point)> = BTreeSet::new();

    for (i, seg) in segments.iter().enumerate() {
        let mut breaks: BTreeSet<Point> = BTreeSet::new();
        breaks.insert(seg.start);
        breaks.insert(seg.end);
        for (j, other) in segments.iter().enumerate() {
            if i == j {
                continue;
            }
            if seg.collinear_with(other) {
                for p in [other.start, other.end] {
                    if seg.contains_point(p) {
                        breaks.insert(p);
                    }
                }
            } else if seg.is_horizontal() != other.is_horizontal() {
                let p = if seg.is_horizontal() {
                    Point::new(other.start.x, seg.start.y)
                } else {
                    Point::new(seg.start.x, other.start.y)
                };
                if seg.contains_point(p) && other.contains_point(p) {
                    breaks.insert(p);
                }
            }
        }
        // `breaks` is sorted lexicographically, which is geometric order
        // along either axis direction.
        let points: Vec<Point> = breaks.into_iter().collect();
        for pair in points.windows(2) {
            elementary.insert((pair[0], pair[1]));
        }
    }

    let mut adjacency: BTreeMap<Point, [Option<Point>; 4]> = BTreeMap::new();
    for (p, q) in elementary {
        let dir = Segment::new(p, q).direction();
        adjacency.entry(p).or_default()[dir_slot(dir)] = Some(q);
        adjacency.entry(q).or_default()[dir_slot(dir.reverse())] = Some(p);
    }
    adjacency
}

fn trace_face(
    adjacency: &BTreeMap<Point, [Option<Point>; 4]>,
    start: Point,
    start_dir: Dir,
    visited: &mut BTreeSet<(Point, Dir)>,
) -> Vec<Point> {
    let mut cycle = Vec::new();
    let (mut vertex, mut dir) = (start, start_dir);
    loop {
        visited.insert((vertex, dir));
        cycle.push(vertex);
        let next = match adjacency[&vertex][dir_slot(dir)] {
            Some(next) => next,
            None => unreachable!("directed edges always have a target"),
        };
        dir = clockwise_successor(dir, |d| adjacency[&next][dir_slot(d)].is_some());
        vertex = next;
        if (vertex, dir) == (start, start_dir) {
            return cycle;
        }
    }
}

fn signed_area2(cycle: &[Point]) -> i128 {
    let mut sum = 0i128;
    for i in 0..cycle.len() {
        let p = cycle[i];
        let q = cycle[(i + 1) % cycle.len()];
        sum += p.x as i128 * q.y as i128 - q.x as i128 * p.y as i128;
    }
    sum
}

fn direction_changes(cycle: &[Point]) -> usize {
    let n = cycle.len();
    let dir_at = |i: usize| Segment::new(cycle[i], cycle[(i + 1) % n]).direction();
    (0..n).filter(|&i| dir_at(i) != dir_at((i + 1) % n)).count()
}

fn cycle_bbox(cycle: &[Point]) -> Rect {
    let min_x = cycle.iter().map(|p| p.x).min();
    let max_x = cycle.iter().map(|p| p.x).max();
    let min_y = cycle.iter().map(|p| p.y).min();
    let max_y = cycle.iter().map(|p| p.y).max();
    match (min_x, min_y, max_x, max_y) {
        (Some(min_x), Some(min_y), Some(max_x), Some(max_y)) => {
            Rect::from_coords(min_x, min_y, max_x, max_y)
        }
        _ => unreachable!("face cycles are non-empty"),
    }
}

/// Successor rule for walking directed edges with the face on the left: the
/// first available direction clockwise from the reversed incoming edge,
/// doubling back only at a dead end. Also used when reconstructing polygons
/// from unions of cells.
pub(crate) fn clockwise_successor<F: Fn(Dir) -> bool>(incoming: Dir, has_outgoing: F) -> Dir {
    let mut candidate = incoming.reverse().cw();
    for _ in 0..3 {
        if has_outgoing(candidate) {
            return candidate;
        }
        candidate = candidate.cw();
    }
    incoming.reverse()
}
