//! Rectilinear polygons with holes.
//!
//! A [`Ring`] is a simple closed rectilinear vertex cycle; a
//! [`PolygonWithHoles`] is one outer ring plus any number of hole rings.
//! Construction validates the input and normalizes orientations (outer
//! counterclockwise, holes clockwise), so the rest of the crate can rely on
//! well-formed geometry and never re-checks it.

use std::collections::BTreeMap;

use crate::geom::{Coord, Dir, Point, Rect, Segment};
use crate::Error;

fn cyclic_pairs<T>(xs: &[T]) -> impl Iterator<Item = (&T, &T)> {
    pairs(xs).chain(xs.last().zip(xs.first()))
}

fn pairs<T>(xs: &[T]) -> impl Iterator<Item = (&T, &T)> {
    xs.windows(2).map(|pair| (&pair[0], &pair[1]))
}

/// A simple closed rectilinear polygon boundary.
///
/// The vertex list does not repeat the first vertex at the end; the closing
/// edge is implicit.
#[derive(Clone, PartialEq, Eq, serde::Serialize)]
pub struct Ring {
    points: Vec<Point>,
}

impl std::fmt::Debug for Ring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.points).finish()
    }
}

impl Ring {
    /// Create a ring from its vertices, in boundary order.
    ///
    /// Fails if there are fewer than four vertices, if any edge is
    /// degenerate or not axis-aligned, or if the boundary is not simple
    /// (non-adjacent edges may not meet at all).
    pub fn new(points: Vec<Point>) -> Result<Self, Error> {
        if points.len() < 4 {
            return Err(Error::TooFewVertices);
        }
        for (p, q) in cyclic_pairs(&points) {
            if p == q {
                return Err(Error::ZeroLengthEdge);
            }
            if p.x != q.x && p.y != q.y {
                return Err(Error::NonRectilinearEdge);
            }
        }

        let ring = Ring { points };
        let edges: Vec<Segment> = ring.edges().collect();
        let n = edges.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if adjacent {
                    // Adjacent edges share one vertex; a collinear overlap
                    // beyond that vertex is a spike.
                    if edges[i].collinear_with(&edges[j]) && overlap_len(&edges[i], &edges[j]) > 0 {
                        return Err(Error::SelfIntersecting);
                    }
                } else if segments_meet(&edges[i], &edges[j]) {
                    return Err(Error::SelfIntersecting);
                }
            }
        }
        Ok(ring)
    }

    /// The vertices, in boundary order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The number of vertices.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The edges, in boundary order, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        cyclic_pairs(&self.points).map(|(p, q)| Segment::new(*p, *q))
    }

    /// Twice the signed area; positive for counterclockwise rings.
    pub fn signed_area2(&self) -> i128 {
        cyclic_pairs(&self.points)
            .map(|(p, q)| p.x as i128 * q.y as i128 - q.x as i128 * p.y as i128)
            .sum()
    }

    /// Is this ring oriented counterclockwise?
    pub fn is_ccw(&self) -> bool {
        self.signed_area2() > 0
    }

    /// The bounding box of the ring.
    pub fn bbox(&self) -> Rect {
        let min_x = self.points.iter().map(|p| p.x).min();
        let max_x = self.points.iter().map(|p| p.x).max();
        let min_y = self.points.iter().map(|p| p.y).min();
        let max_y = self.points.iter().map(|p| p.y).max();
        match (min_x, min_y, max_x, max_y) {
            (Some(min_x), Some(min_y), Some(max_x), Some(max_y)) => {
                Rect::from_coords(min_x, min_y, max_x, max_y)
            }
            _ => unreachable!("rings have at least four vertices"),
        }
    }

    fn reverse(&mut self) {
        self.points.reverse();
    }
}

/// Overlap length of two collinear segments (0 if they only touch).
fn overlap_len(a: &Segment, b: &Segment) -> Coord {
    if a.is_horizontal() {
        (a.max_x().min(b.max_x()) - a.min_x().max(b.min_x())).max(0)
    } else {
        (a.max_y().min(b.max_y()) - a.min_y().max(b.min_y())).max(0)
    }
}

/// Do two axis-aligned segments share any point (endpoints included)?
fn segments_meet(a: &Segment, b: &Segment) -> bool {
    if a.is_horizontal() == b.is_horizontal() {
        return a.collinear_with(b)
            && a.min_x() <= b.max_x()
            && b.min_x() <= a.max_x()
            && a.min_y() <= b.max_y()
            && b.min_y() <= a.max_y();
    }
    let (h, v) = if a.is_horizontal() { (a, b) } else { (b, a) };
    v.min_x() >= h.min_x()
        && v.min_x() <= h.max_x()
        && h.min_y() >= v.min_y()
        && h.min_y() <= v.max_y()
}

/// Where a perpendicular pair of axis-aligned segments crosses, if anywhere.
fn perpendicular_crossing(a: &Segment, b: &Segment) -> Option<Point> {
    if a.is_horizontal() == b.is_horizontal() {
        return None;
    }
    let (h, v) = if a.is_horizontal() { (a, b) } else { (b, a) };
    let p = Point::new(v.start.x, h.start.y);
    (h.min_x() <= p.x && p.x <= h.max_x() && v.min_y() <= p.y && p.y <= v.max_y()).then_some(p)
}

/// A rectilinear polygon: one outer boundary and zero or more holes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PolygonWithHoles {
    outer: Ring,
    holes: Vec<Ring>,
}

/// An ordered sequence of polygons with holes.
pub type MultiPolygon = Vec<PolygonWithHoles>;

impl PolygonWithHoles {
    /// Create a polygon from an outer ring and hole rings.
    ///
    /// Orientations are normalized: the outer ring is stored
    /// counterclockwise and holes clockwise, regardless of the input order.
    /// Distinct rings may touch at shared vertices but must not cross or
    /// overlap along an edge.
    pub fn new(mut outer: Ring, mut holes: Vec<Ring>) -> Result<Self, Error> {
        if !outer.is_ccw() {
            outer.reverse();
        }
        for hole in &mut holes {
            if hole.is_ccw() {
                hole.reverse();
            }
        }

        let rings: Vec<&Ring> = std::iter::once(&outer).chain(holes.iter()).collect();
        for i in 0..rings.len() {
            for j in (i + 1)..rings.len() {
                for e1 in rings[i].edges() {
                    for e2 in rings[j].edges() {
                        if !rings_may_touch(&e1, &e2) {
                            return Err(Error::SelfIntersecting);
                        }
                    }
                }
            }
        }

        Ok(PolygonWithHoles { outer, holes })
    }

    /// A polygon with no holes.
    pub fn simple(outer: Ring) -> Result<Self, Error> {
        Self::new(outer, Vec::new())
    }

    /// The outer boundary, counterclockwise.
    pub fn outer(&self) -> &Ring {
        &self.outer
    }

    /// The holes, clockwise.
    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    /// All boundary edges: the outer ring's followed by each hole's.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        self.outer
            .edges()
            .chain(self.holes.iter().flat_map(|h| h.edges()))
    }

    /// Is this a plain rectangle: four outer vertices and no holes?
    pub fn is_trivial_rectangle(&self) -> bool {
        self.outer.len() == 4 && self.holes.is_empty()
    }

    /// The bounding box of the outer ring.
    pub fn bbox(&self) -> Rect {
        self.outer.bbox()
    }

    /// The area of the region: outer area minus hole areas.
    pub fn area(&self) -> u64 {
        let signed2: i128 = self.outer.signed_area2()
            + self
                .holes
                .iter()
                .map(|h| h.signed_area2())
                .sum::<i128>();
        debug_assert!(signed2 > 0);
        (signed2 / 2) as u64
    }
}

/// Edges of distinct rings may share at most a single point, and that point
/// must be an endpoint of both.
fn rings_may_touch(e1: &Segment, e2: &Segment) -> bool {
    if e1.collinear_with(e2) {
        // Collinear segments may touch at a single point, which is then an
        // endpoint of both; an overlap of positive length is a crossing.
        overlap_len(e1, e2) == 0
    } else if let Some(p) = perpendicular_crossing(e1, e2) {
        (p == e1.start || p == e1.end) && (p == e2.start || p == e2.end)
    } else {
        true
    }
}

/// A map from each concave vertex to its two inward axis directions.
pub type ConcaveMap = BTreeMap<Point, [Dir; 2]>;

/// Collect the concave vertices of `polygon` and their inward directions.
///
/// Walking the edges of a ring in its stored orientation, a vertex is
/// concave exactly when the incoming edge's direction rotated clockwise is
/// the outgoing edge's direction; its two inward directions are the incoming
/// direction and that direction rotated counterclockwise. A vertex shared by
/// two rings is not concave: such entries cancel.
pub fn concave_vertices(polygon: &PolygonWithHoles) -> ConcaveMap {
    let mut map = ring_concave_vertices(polygon.outer());
    for hole in polygon.holes() {
        for (vertex, dirs) in ring_concave_vertices(hole) {
            if map.remove(&vertex).is_none() {
                map.insert(vertex, dirs);
            }
        }
    }
    map
}

fn ring_concave_vertices(ring: &Ring) -> ConcaveMap {
    let edges: Vec<Segment> = ring.edges().collect();
    let mut map = ConcaveMap::new();
    for (edge, next) in cyclic_pairs(&edges) {
        let dir = edge.direction();
        if dir.cw() == next.direction() {
            map.insert(edge.end, [dir, dir.ccw()]);
        }
    }
    map
}

/// The result of shooting an axis-aligned ray at a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RayHit {
    /// No common point.
    Miss,
    /// A single common point.
    At(Point),
    /// A collinear overlap, clamped to the ray.
    Along(Point, Point),
}

/// Intersect the ray from `origin` in direction `dir` with `seg`.
pub(crate) fn ray_segment_intersection(origin: Point, dir: Dir, seg: &Segment) -> RayHit {
    let vertical = matches!(dir, Dir::Up | Dir::Down);
    if seg.is_vertical() != vertical {
        // Perpendicular: at most one crossing point.
        let p = if vertical {
            Point::new(origin.x, seg.start.y)
        } else {
            Point::new(seg.start.x, origin.y)
        };
        let on_seg = if vertical {
            seg.min_x() <= p.x && p.x <= seg.max_x()
        } else {
            seg.min_y() <= p.y && p.y <= seg.max_y()
        };
        let on_ray = match dir {
            Dir::Up => p.y >= origin.y,
            Dir::Down => p.y <= origin.y,
            Dir::Right => p.x >= origin.x,
            Dir::Left => p.x <= origin.x,
        };
        if on_seg && on_ray {
            RayHit::At(p)
        } else {
            RayHit::Miss
        }
    } else {
        // Parallel: a hit requires the same supporting line.
        let collinear = if vertical {
            seg.start.x == origin.x
        } else {
            seg.start.y == origin.y
        };
        if !collinear {
            return RayHit::Miss;
        }
        let (seg_lo, seg_hi) = if vertical {
            (seg.min_y(), seg.max_y())
        } else {
            (seg.min_x(), seg.max_x())
        };
        let origin_c = if vertical { origin.y } else { origin.x };
        let (lo, hi) = if dir.is_positive() {
            (seg_lo.max(origin_c), seg_hi)
        } else {
            (seg_lo, seg_hi.min(origin_c))
        };
        let at = |c: Coord| {
            if vertical {
                Point::new(origin.x, c)
            } else {
                Point::new(c, origin.y)
            }
        };
        match lo.cmp(&hi) {
            std::cmp::Ordering::Greater => RayHit::Miss,
            std::cmp::Ordering::Equal => RayHit::At(at(lo)),
            std::cmp::Ordering::Less => RayHit::Along(at(lo), at(hi)),
        }
    }
}

/// The closest boundary point hit by the ray from `origin` in direction
/// `dir`, ignoring edges incident to `origin`.
///
/// Collinear overlaps contribute both overlap endpoints. "Closest" is the
/// lexicographically smallest hit for positive directions and the largest
/// for negative ones, which coincides with geometric distance along an
/// axis-aligned ray.
pub(crate) fn closest_boundary_hit(
    polygon: &PolygonWithHoles,
    origin: Point,
    dir: Dir,
) -> Option<Point> {
    let mut hits = std::collections::BTreeSet::new();
    for edge in polygon.edges() {
        if edge.start == origin || edge.end == origin {
            continue;
        }
        match ray_segment_intersection(origin, dir, &edge) {
            RayHit::Miss => {}
            RayHit::At(p) => {
                hits.insert(p);
            }
            RayHit::Along(p, q) => {
                hits.insert(p);
                hits.insert(q);
            }
        }
    }
    if dir.is_positive() {
        hits.into_iter().next()
    } else {
        hits.into_iter().next_back()
    }
}
