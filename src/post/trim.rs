//! Shrink rectangles into their redundant borders.

use crate::geom::{Point, Rect};
use crate::grid::{CellGraph, CellIdx, CellVec};
use crate::polygon::PolygonWithHoles;
use crate::provider::RuntimeState;
use crate::Cover;

/// Shrink every rectangle of the cover as far as redundant borders allow.
///
/// For each rectangle, the row (or column) of cells just inside each side is
/// inspected; if every cell in it is covered at least twice, the side moves
/// inward past that row and the cells' multiplicities drop. The four sides
/// are processed top, bottom, right, left, each until it hits a
/// non-redundant row.
///
/// Assumes no rectangle is fully redundant (run prune first); a rectangle
/// that trims away entirely panics.
pub(crate) fn trim_cover(cover: &mut Cover, polygon: &PolygonWithHoles, state: &mut RuntimeState) {
    state.ensure_coverage(polygon, cover);
    let RuntimeState {
        graph, coverage, ..
    } = state;

    for rect in cover.iter_mut() {
        trim_top(rect, graph, coverage);
        trim_bottom(rect, graph, coverage);
        trim_right(rect, graph, coverage);
        trim_left(rect, graph, coverage);
    }
}

fn corner_cell(graph: &CellGraph, corner: Point, top_right: bool) -> CellIdx {
    let found = if top_right {
        graph.cell_at_top_right(corner)
    } else {
        graph.cell_at_bottom_left(corner)
    };
    match found {
        Some(idx) => idx,
        None => panic!("trimmed rectangles must stay unions of cells"),
    }
}

fn trim_top(rect: &mut Rect, graph: &CellGraph, coverage: &mut CellVec<u32>) {
    let cells = graph.cells();
    let mut cur = corner_cell(graph, rect.top_right(), true);
    loop {
        let row_right = cur;
        let top_left = rect.top_left();
        let mut seen = Vec::new();
        loop {
            if coverage[cur] == 1 {
                // Covered by this rectangle alone: the row stays.
                return;
            }
            seen.push(cur);
            let cell = &cells[cur];
            if cell.rect.top_left() == top_left {
                break;
            }
            cur = match cell.left {
                Some(left) => left,
                None => unreachable!("row ends at the rectangle's left edge"),
            };
        }
        rect.shrink_top(cells[row_right].rect.height());
        cur = match cells[row_right].bottom {
            Some(below) => below,
            None => panic!("cannot trim a fully redundant rectangle; prune first"),
        };
        for idx in seen {
            coverage[idx] -= 1;
        }
    }
}

fn trim_bottom(rect: &mut Rect, graph: &CellGraph, coverage: &mut CellVec<u32>) {
    let cells = graph.cells();
    let mut cur = corner_cell(graph, rect.bottom_left(), false);
    loop {
        let row_left = cur;
        let bottom_right = rect.bottom_right();
        let mut seen = Vec::new();
        loop {
            if coverage[cur] == 1 {
                return;
            }
            seen.push(cur);
            let cell = &cells[cur];
            if cell.rect.bottom_right() == bottom_right {
                break;
            }
            cur = match cell.right {
                Some(right) => right,
                None => unreachable!("row ends at the rectangle's right edge"),
            };
        }
        rect.shrink_bottom(cells[row_left].rect.height());
        cur = match cells[row_left].top {
            Some(above) => above,
            None => panic!("cannot trim a fully redundant rectangle; prune first"),
        };
        for idx in seen {
            coverage[idx] -= 1;
        }
    }
}

fn trim_right(rect: &mut Rect, graph: &CellGraph, coverage: &mut CellVec<u32>) {
    let cells = graph.cells();
    let mut cur = corner_cell(graph, rect.top_right(), true);
    loop {
        let column_top = cur;
        let bottom_right = rect.bottom_right();
        let mut seen = Vec::new();
        loop {
            if coverage[cur] == 1 {
                return;
            }
            seen.push(cur);
            let cell = &cells[cur];
            if cell.rect.bottom_right() == bottom_right {
                break;
            }
            cur = match cell.bottom {
                Some(below) => below,
                None => unreachable!("column ends at the rectangle's bottom edge"),
            };
        }
        rect.shrink_right(cells[column_top].rect.width());
        cur = match cells[column_top].left {
            Some(left) => left,
            None => panic!("cannot trim a fully redundant rectangle; prune first"),
        };
        for idx in seen {
            coverage[idx] -= 1;
        }
    }
}

fn trim_left(rect: &mut Rect, graph: &CellGraph, coverage: &mut CellVec<u32>) {
    let cells = graph.cells();
    let mut cur = corner_cell(graph, rect.bottom_left(), false);
    loop {
        let column_bottom = cur;
        let top_left = rect.top_left();
        let mut seen = Vec::new();
        loop {
            if coverage[cur] == 1 {
                return;
            }
            seen.push(cur);
            let cell = &cells[cur];
            if cell.rect.top_left() == top_left {
                break;
            }
            cur = match cell.top {
                Some(above) => above,
                None => unreachable!("column ends at the rectangle's top edge"),
            };
        }
        rect.shrink_left(cells[column_bottom].rect.width());
        cur = match cells[column_bottom].right {
            Some(right) => right,
            None => panic!("cannot trim a fully redundant rectangle; prune first"),
        };
        for idx in seen {
            coverage[idx] -= 1;
        }
    }
}
