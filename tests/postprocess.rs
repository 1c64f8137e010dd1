//! Postprocessor behaviour on hand-built covers.

use rectcover::{
    verify_by_union, CellGraph, Coord, Costs, Cover, Point, PolygonWithHoles, Postprocessor, Rect,
    Ring, RuntimeState,
};

fn ring(points: &[(Coord, Coord)]) -> Ring {
    Ring::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
}

fn poly(outer: &[(Coord, Coord)]) -> PolygonWithHoles {
    PolygonWithHoles::simple(ring(outer)).unwrap()
}

fn rect(min_x: Coord, min_y: Coord, max_x: Coord, max_y: Coord) -> Rect {
    Rect::from_coords(min_x, min_y, max_x, max_y)
}

/// An L with cells `[0,4]x[0,2]`, `[4,6]x[0,2]` and `[0,4]x[2,4]`.
fn low_l() -> PolygonWithHoles {
    poly(&[(0, 0), (6, 0), (6, 2), (4, 2), (4, 4), (0, 4)])
}

fn sorted(mut cover: Cover) -> Cover {
    cover.sort();
    cover
}

/// The multiplicity vector kept in the state either was dropped for
/// rebuilding or matches the cover exactly.
fn assert_coverage_consistent(state: &RuntimeState, cover: &[Rect]) {
    if state.coverage.is_empty() {
        return;
    }
    for (idx, cell) in state.graph.cells().iter() {
        let expected = cover.iter().filter(|r| r.contains(&cell.rect)).count() as u32;
        assert_eq!(state.coverage[idx], expected, "cell {:?}", cell.rect);
    }
}

#[test]
fn prune_removes_exactly_the_redundant_rectangle() {
    let p = low_l();
    let costs = Costs { creation: 1, area: 1 };
    let mut cover = vec![
        rect(0, 0, 4, 4),
        rect(0, 0, 4, 2),
        rect(0, 2, 4, 4),
        rect(4, 0, 6, 2),
    ];
    let mut state = RuntimeState::new();
    Postprocessor::Prune.apply(&mut cover, &p, &costs, &mut state);

    // Only the big square was fully redundant.
    assert_eq!(
        sorted(cover.clone()),
        vec![rect(0, 0, 4, 2), rect(0, 2, 4, 4), rect(4, 0, 6, 2)]
    );
    assert!(verify_by_union(&cover, &p));
    assert_coverage_consistent(&state, &cover);

    // Pruning again changes nothing.
    let before = cover.clone();
    Postprocessor::Prune.apply(&mut cover, &p, &costs, &mut state);
    assert_eq!(cover, before);
}

#[test]
fn trim_shrinks_into_redundant_rows() {
    let p = low_l();
    let costs = Costs { creation: 0, area: 1 };
    let mut cover = vec![rect(0, 0, 4, 4), rect(0, 0, 4, 2), rect(4, 0, 6, 2)];
    let mut state = RuntimeState::new();
    Postprocessor::Trim.apply(&mut cover, &p, &costs, &mut state);

    // The square's bottom half was doubly covered, so it shrinks upward;
    // nothing else moves.
    assert_eq!(
        cover,
        vec![rect(0, 2, 4, 4), rect(0, 0, 4, 2), rect(4, 0, 6, 2)]
    );
    assert!(verify_by_union(&cover, &p));
    assert_coverage_consistent(&state, &cover);

    // Trimming a trimmed cover is a no-op.
    let before = cover.clone();
    Postprocessor::Trim.apply(&mut cover, &p, &costs, &mut state);
    assert_eq!(cover, before);
}

#[test]
fn join_merges_adjacent_aligned_rectangles() {
    let p = poly(&[(0, 0), (4, 0), (4, 2), (0, 2)]);
    let costs = Costs { creation: 1, area: 0 };
    let mut cover = vec![rect(0, 0, 2, 2), rect(2, 0, 4, 2)];
    let mut state = RuntimeState::new();
    Postprocessor::Join.apply(&mut cover, &p, &costs, &mut state);

    assert_eq!(cover, vec![rect(0, 0, 4, 2)]);
    assert_eq!(costs.cover_cost(&cover), 1);
}

#[test]
fn join_keeps_rectangles_when_the_merge_is_not_cheaper() {
    let p = poly(&[(0, 0), (4, 0), (4, 2), (0, 2)]);
    // With pure area costs the join saves nothing.
    let costs = Costs { creation: 0, area: 1 };
    let mut cover = vec![rect(0, 0, 2, 2), rect(2, 0, 4, 2)];
    Postprocessor::Join.apply(&mut cover, &p, &costs, &mut RuntimeState::new());
    assert_eq!(cover, vec![rect(0, 0, 2, 2), rect(2, 0, 4, 2)]);
}

#[test]
fn join_full_rejects_merges_that_leave_the_region() {
    let p = low_l();
    let costs = Costs { creation: 10, area: 0 };
    // The bounding box of these two crosses the notch boundary.
    let mut cover = vec![rect(0, 2, 4, 4), rect(4, 0, 6, 2)];
    Postprocessor::JoinFull.apply(&mut cover, &p, &costs, &mut RuntimeState::new());
    assert_eq!(cover, vec![rect(0, 2, 4, 4), rect(4, 0, 6, 2)]);
}

#[test]
fn join_full_merges_any_cheaper_pair() {
    let p = low_l();
    let costs = Costs { creation: 1, area: 0 };
    let mut cover = vec![rect(0, 0, 4, 2), rect(4, 0, 6, 2), rect(0, 2, 4, 4)];
    Postprocessor::JoinFull.apply(&mut cover, &p, &costs, &mut RuntimeState::new());

    // The two bottom rectangles merge into the full bottom row; nothing can
    // absorb the arm above without leaving the region.
    assert_eq!(sorted(cover), vec![rect(0, 0, 6, 2), rect(0, 2, 4, 4)]);
}

#[test]
fn bbox_split_replaces_a_rectangle_by_its_unique_part() {
    let p = low_l();
    let costs = Costs { creation: 0, area: 1 };
    let mut cover = vec![rect(0, 0, 4, 4), rect(0, 0, 4, 2), rect(4, 0, 6, 2)];
    let mut state = RuntimeState::new();
    Postprocessor::BboxSplit.apply(&mut cover, &p, &costs, &mut state);

    // Only the top half of the square was uniquely covered; the square is
    // replaced by it.
    assert_eq!(
        sorted(cover.clone()),
        vec![rect(0, 0, 4, 2), rect(0, 2, 4, 4), rect(4, 0, 6, 2)]
    );
    assert!(verify_by_union(&cover, &p));
    assert_coverage_consistent(&state, &cover);
}

#[test]
fn partition_split_carves_up_exposed_arms() {
    // A plus covered by its two bars: the vertical bar's unique parts are
    // the two arms, each re-covered on its own.
    let p = poly(&[
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
    ]);
    let costs = Costs { creation: 0, area: 1 };
    let mut cover = vec![rect(1, 0, 2, 3), rect(0, 1, 3, 2)];
    let mut state = RuntimeState::new();
    Postprocessor::PartitionSplit.apply(&mut cover, &p, &costs, &mut state);

    assert_eq!(
        sorted(cover.clone()),
        vec![rect(0, 1, 3, 2), rect(1, 0, 2, 1), rect(1, 2, 2, 3)]
    );
    // No overlap is left, so the cost is exactly the area.
    assert_eq!(costs.cover_cost(&cover), p.area());
    assert!(verify_by_union(&cover, &p));
    assert_coverage_consistent(&state, &cover);
}

#[test]
fn splits_drop_rectangles_with_no_unique_cells() {
    let p = low_l();
    let costs = Costs { creation: 0, area: 1 };
    // The square duplicates the two smaller rectangles entirely.
    let mut cover = vec![
        rect(0, 0, 4, 4),
        rect(0, 0, 4, 2),
        rect(0, 2, 4, 4),
        rect(4, 0, 6, 2),
    ];
    let mut state = RuntimeState::new();
    Postprocessor::BboxSplit.apply(&mut cover, &p, &costs, &mut state);

    assert_eq!(
        sorted(cover.clone()),
        vec![rect(0, 0, 4, 2), rect(0, 2, 4, 4), rect(4, 0, 6, 2)]
    );
    assert!(verify_by_union(&cover, &p));
    assert_coverage_consistent(&state, &cover);
}

#[test]
fn postprocessors_share_one_decomposition() {
    let p = low_l();
    let costs = Costs { creation: 1, area: 1 };
    let mut cover = vec![rect(0, 0, 4, 4), rect(0, 0, 4, 2), rect(4, 0, 6, 2)];
    let mut state = RuntimeState::new();
    Postprocessor::Prune.apply(&mut cover, &p, &costs, &mut state);
    let cells_before = state.graph.len();
    Postprocessor::Trim.apply(&mut cover, &p, &costs, &mut state);
    assert_eq!(state.graph.len(), cells_before);
    assert_eq!(state.graph.len(), CellGraph::from_polygon(&p).len());
}
