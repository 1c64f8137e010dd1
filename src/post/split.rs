//! Replace rectangles by cheaper covers of their uniquely-covered parts.
//!
//! Removing a rectangle from a cover exposes exactly the cells only it
//! covers. If covering those cells from scratch is cheaper than the
//! rectangle, the rectangle is replaced: either by one bounding box per
//! connected group of exposed cells, or by a full rectangle partition of
//! each group.

use std::collections::{BTreeMap, BTreeSet};

use crate::arrangement::clockwise_successor;
use crate::geom::{Dir, Point, Rect, Segment};
use crate::grid::{CellGraph, CellIdx};
use crate::partition::partition_cover;
use crate::polygon::{PolygonWithHoles, Ring};
use crate::provider::RuntimeState;
use crate::{Costs, Cover};

/// How to re-cover the exposed cells of a split rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Splitter {
    /// One bounding box per connected group.
    Bbox,
    /// A rectangle partition of each connected group.
    Partition,
}

/// Try to replace each rectangle of the cover by a cheaper split.
///
/// Replacements are appended after the scan so they are not themselves
/// split again. The coverage multiplicities stay exact throughout: a cell
/// of a replaced rectangle keeps its count when some piece still covers it
/// and is decremented otherwise.
pub(crate) fn split_cover(
    cover: &mut Cover,
    polygon: &PolygonWithHoles,
    costs: &Costs,
    state: &mut RuntimeState,
    splitter: Splitter,
) {
    state.ensure_coverage(polygon, cover);

    let mut replacements = Vec::new();
    let mut i = 0;
    while i < cover.len() {
        let rect = cover[i];
        let pieces = split_rectangle(&rect, state, splitter);
        if costs.cover_cost(&pieces) < costs.rect_cost(&rect) {
            reduce_coverage(&rect, &pieces, state);
            replacements.extend(pieces);
            cover.swap_remove(i);
        } else {
            i += 1;
        }
    }
    cover.extend(replacements);
}

fn split_rectangle(rect: &Rect, state: &RuntimeState, splitter: Splitter) -> Vec<Rect> {
    let graph = &state.graph;
    let mut unique: Vec<CellIdx> = graph
        .cells_within(rect)
        .filter(|&idx| state.coverage[idx] == 1)
        .collect();
    unique.sort_by_key(|&idx| graph.cells()[idx].rect);

    let components = connected_components(graph, &unique);
    match splitter {
        Splitter::Bbox => components
            .iter()
            .map(|component| {
                let mut bbox = graph.cells()[component[0]].rect;
                for &idx in &component[1..] {
                    bbox = bbox.join(&graph.cells()[idx].rect);
                }
                bbox
            })
            .collect(),
        Splitter::Partition => components
            .iter()
            .flat_map(|component| {
                component_polygons(graph, component)
                    .into_iter()
                    .flat_map(|polygon| partition_cover(&polygon))
            })
            .collect(),
    }
}

/// Group `unique` cells into edge-connected components, each sorted; the
/// components come out ordered by their smallest cell.
fn connected_components(graph: &CellGraph, unique: &[CellIdx]) -> Vec<Vec<CellIdx>> {
    let members: BTreeSet<CellIdx> = unique.iter().copied().collect();
    let mut seen: BTreeSet<CellIdx> = BTreeSet::new();
    let mut components = Vec::new();
    for &start in unique {
        if !seen.insert(start) {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            component.push(idx);
            let cell = &graph.cells()[idx];
            for neighbour in [cell.left, cell.right, cell.top, cell.bottom]
                .into_iter()
                .flatten()
            {
                if members.contains(&neighbour) && seen.insert(neighbour) {
                    stack.push(neighbour);
                }
            }
        }
        component.sort();
        components.push(component);
    }
    components
}

/// Reconstruct the region covered by a connected group of cells as
/// polygons with holes.
///
/// The boundary consists of the cell edges not shared with another member
/// cell, directed with the interior on the left. Walking those edges with
/// the tightest-turn rule yields counterclockwise rings for outer
/// boundaries and clockwise rings for holes. A group that pinches at a
/// corner yields several outer rings, each a polygon of its own.
fn component_polygons(graph: &CellGraph, component: &[CellIdx]) -> Vec<PolygonWithHoles> {
    let members: BTreeSet<CellIdx> = component.iter().copied().collect();

    let mut outgoing: BTreeMap<Point, Vec<(Dir, Point)>> = BTreeMap::new();
    for &idx in component {
        let cell = &graph.cells()[idx];
        let r = cell.rect;
        let sides = [
            (cell.bottom, r.bottom_left(), r.bottom_right()),
            (cell.right, r.bottom_right(), r.top_right()),
            (cell.top, r.top_right(), r.top_left()),
            (cell.left, r.top_left(), r.bottom_left()),
        ];
        for (neighbour, from, to) in sides {
            let internal = neighbour.is_some_and(|n| members.contains(&n));
            if !internal {
                let dir = Segment::new(from, to).direction();
                outgoing.entry(from).or_default().push((dir, to));
            }
        }
    }

    let mut outers = Vec::new();
    let mut holes = Vec::new();
    let mut visited: BTreeSet<(Point, Dir)> = BTreeSet::new();
    for (&start, edges) in &outgoing {
        for &(start_dir, _) in edges {
            if visited.contains(&(start, start_dir)) {
                continue;
            }
            let ring = trace_ring(&outgoing, start, start_dir, &mut visited);
            if ring.is_ccw() {
                outers.push(ring);
            } else {
                holes.push(ring);
            }
        }
    }

    let build = |outer: Ring, holes: Vec<Ring>| match PolygonWithHoles::new(outer, holes) {
        Ok(polygon) => polygon,
        Err(_) => unreachable!("cell union boundaries are valid polygons"),
    };

    if outers.len() == 1 {
        let outer = match outers.pop() {
            Some(outer) => outer,
            None => unreachable!(),
        };
        return vec![build(outer, holes)];
    }

    // The group pinched into several outer rings; attach each hole to the
    // ring containing it.
    let mut hole_groups: Vec<Vec<Ring>> = outers.iter().map(|_| Vec::new()).collect();
    for hole in holes {
        let probe = match hole.points().iter().min() {
            Some(&p) => p,
            None => unreachable!("rings are non-empty"),
        };
        let owner = outers
            .iter()
            .position(|outer| ring_contains(outer, probe))
            .unwrap_or(0);
        hole_groups[owner].push(hole);
    }
    outers
        .into_iter()
        .zip(hole_groups)
        .map(|(outer, holes)| build(outer, holes))
        .collect()
}

fn trace_ring(
    outgoing: &BTreeMap<Point, Vec<(Dir, Point)>>,
    start: Point,
    start_dir: Dir,
    visited: &mut BTreeSet<(Point, Dir)>,
) -> Ring {
    let mut points = Vec::new();
    let (mut vertex, mut dir) = (start, start_dir);
    loop {
        visited.insert((vertex, dir));
        points.push(vertex);
        let next = match outgoing[&vertex].iter().find(|&&(d, _)| d == dir) {
            Some(&(_, next)) => next,
            None => unreachable!("walked edges exist"),
        };
        dir = clockwise_successor(dir, |candidate| {
            outgoing
                .get(&next)
                .is_some_and(|edges| edges.iter().any(|&(d, _)| d == candidate))
        });
        vertex = next;
        if (vertex, dir) == (start, start_dir) {
            break;
        }
    }

    // Merge collinear runs: cell corners in the middle of a straight
    // boundary stretch are not polygon vertices.
    let n = points.len();
    let simplified: Vec<Point> = (0..n)
        .filter(|&k| {
            let prev = points[(k + n - 1) % n];
            let here = points[k];
            let next = points[(k + 1) % n];
            Segment::new(prev, here).direction() != Segment::new(here, next).direction()
        })
        .map(|k| points[k])
        .collect();

    match Ring::new(simplified) {
        Ok(ring) => ring,
        Err(_) => unreachable!("cell union boundaries are simple rings"),
    }
}

/// Even-odd test for a point strictly inside `ring` (points on the boundary
/// are unreliable and do not occur for the probes used here).
fn ring_contains(ring: &Ring, p: Point) -> bool {
    let mut crossings = 0;
    for edge in ring.edges() {
        if edge.is_vertical() && edge.start.x > p.x && edge.min_y() <= p.y && p.y < edge.max_y() {
            crossings += 1;
        }
    }
    crossings % 2 == 1
}

/// After replacing `original` by `pieces`, decrement the cells no piece
/// covers any more.
fn reduce_coverage(original: &Rect, pieces: &[Rect], state: &mut RuntimeState) {
    let RuntimeState {
        graph, coverage, ..
    } = state;
    for idx in graph.cells_within(original) {
        let cell_rect = graph.cells()[idx].rect;
        if !pieces.iter().any(|piece| piece.contains(&cell_rect)) {
            coverage[idx] -= 1;
            // A cell may only lose this rectangle because another one still
            // covers it; reaching zero means the pieces were chosen wrong.
            debug_assert!(coverage[idx] >= 1);
        }
    }
}
