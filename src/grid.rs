//! The base-cell decomposition of a polygon and the grid graph built on it.
//!
//! Cutting a rectilinear polygon along two rays per concave vertex (each ray
//! stopped at the first boundary edge it meets) decomposes the region into
//! *base cells*: interior-disjoint rectangles whose union is the region.
//! Crucially, two adjacent cells always share a complete edge, so every cell
//! has at most one neighbour per side and the decomposition forms a grid
//! graph. All covering algorithms in this crate run on that graph.

use std::collections::{BTreeMap, BTreeSet};

use crate::arrangement::rectangular_faces;
use crate::geom::{Point, Rect, Segment};
use crate::polygon::{closest_boundary_hit, concave_vertices, PolygonWithHoles};

/// An index into a [`CellGraph`]'s cell arena.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct CellIdx(pub usize);

/// A vector indexed by [`CellIdx`].
#[derive(Clone)]
pub struct CellVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(CellVec, CellIdx, "c");

/// One base cell and its (at most four) neighbours.
#[derive(Clone, Debug)]
pub struct Cell {
    /// The cell's extent.
    pub rect: Rect,
    /// The unique cell sharing this cell's left edge, if any.
    pub left: Option<CellIdx>,
    /// The unique cell sharing this cell's right edge, if any.
    pub right: Option<CellIdx>,
    /// The unique cell sharing this cell's top edge, if any.
    pub top: Option<CellIdx>,
    /// The unique cell sharing this cell's bottom edge, if any.
    pub bottom: Option<CellIdx>,
}

/// Compute the base cells of `polygon`.
///
/// For a plain rectangle this is the rectangle itself; callers that want to
/// skip trivial inputs must do so themselves.
pub fn base_cells(polygon: &PolygonWithHoles) -> Vec<Rect> {
    let concave = concave_vertices(polygon);
    let mut cuts = Vec::new();
    for (&vertex, dirs) in &concave {
        for &dir in dirs {
            let hit = match closest_boundary_hit(polygon, vertex, dir) {
                Some(hit) => hit,
                None => unreachable!("an inward ray always meets the boundary"),
            };
            cuts.push(Segment::new(vertex, hit));
        }
    }
    rectangular_faces(polygon, &cuts)
}

/// The grid graph of a polygon's base cells.
///
/// Cells are stored in a single arena and refer to their neighbours by
/// index; two corner maps (`bottom-left corner -> cell` and `top-right
/// corner -> cell`) support corner lookups, which is all the covering
/// algorithms need because every rectangle they handle is a union of cells.
#[derive(Clone, Debug, Default)]
pub struct CellGraph {
    cells: CellVec<Cell>,
    bottom_left: BTreeMap<Point, CellIdx>,
    top_right: BTreeMap<Point, CellIdx>,
}

impl CellGraph {
    /// Build the graph from a set of base cells.
    ///
    /// Cells are sorted by top-left corner (`x` ascending, then `y`
    /// descending), so when a cell is inserted, its left and top neighbours
    /// are already present and can be linked through the corner maps: a cell
    /// whose top-right corner is our top-left corner is our left neighbour,
    /// and one whose bottom-left corner is our top-left corner sits on top
    /// of us.
    pub fn build(mut base: Vec<Rect>) -> CellGraph {
        base.sort_by(|a, b| {
            let (ta, tb) = (a.top_left(), b.top_left());
            ta.x.cmp(&tb.x).then(tb.y.cmp(&ta.y))
        });

        let mut graph = CellGraph::default();
        for rect in base {
            let tl = rect.top_left();
            let id = graph.cells.push(Cell {
                rect,
                left: None,
                right: None,
                top: None,
                bottom: None,
            });
            if let Some(&left) = graph.top_right.get(&tl) {
                graph.cells[id].left = Some(left);
                graph.cells[left].right = Some(id);
            }
            if let Some(&top) = graph.bottom_left.get(&tl) {
                graph.cells[id].top = Some(top);
                graph.cells[top].bottom = Some(id);
            }
            graph.bottom_left.insert(rect.bottom_left(), id);
            graph.top_right.insert(rect.top_right(), id);
        }
        graph
    }

    /// Decompose `polygon` and build its graph in one step.
    pub fn from_polygon(polygon: &PolygonWithHoles) -> CellGraph {
        CellGraph::build(base_cells(polygon))
    }

    /// The number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Does the graph have no cells yet?
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell arena.
    pub fn cells(&self) -> &CellVec<Cell> {
        &self.cells
    }

    /// The cell with the given bottom-left corner, if any.
    pub fn cell_at_bottom_left(&self, corner: Point) -> Option<CellIdx> {
        self.bottom_left.get(&corner).copied()
    }

    /// The cell with the given top-right corner, if any.
    pub fn cell_at_top_right(&self, corner: Point) -> Option<CellIdx> {
        self.top_right.get(&corner).copied()
    }

    /// For every cell, the number of cells below it in its column.
    pub fn heights(&self) -> CellVec<usize> {
        let mut heights = CellVec::with_size(self.cells.len());
        for (_, cell) in self.cells.iter() {
            if cell.bottom.is_some() {
                continue;
            }
            let mut h = 0;
            let mut top = cell.top;
            while let Some(t) = top {
                h += 1;
                heights[t] = h;
                top = self.cells[t].top;
            }
        }
        heights
    }

    /// Iterate over the cells inside `bounds`, which must be a union of
    /// cells.
    ///
    /// # Panics
    ///
    /// Panics if `bounds` is not a union of cells; that is an internal
    /// invariant violation in every caller.
    pub fn cells_within(&self, bounds: &Rect) -> CellsWithin<'_> {
        let start = match self.top_right.get(&bounds.top_right()) {
            Some(&start) => start,
            None => panic!("iteration bounds must be a union of cells"),
        };
        CellsWithin {
            cells: &self.cells,
            bottom_left: bounds.bottom_left(),
            cursor: Some((start, start)),
        }
    }

    /// All rectangles that are unions of cells.
    ///
    /// For each cell, the rectangles having that cell in their top-right
    /// corner are enumerated by walking the left chain (which caps the
    /// available height) and, per column, the bottom chain.
    pub fn all_rects(&self) -> Vec<Rect> {
        let heights = self.heights();
        let mut rects = Vec::new();
        for (i, cell) in self.cells.iter() {
            let tr = cell.rect.top_right();
            let mut max_height = heights[i];
            let mut left = Some(i);
            while let Some(l) = left {
                max_height = max_height.min(heights[l]);
                let mut down = l;
                for h in 0..=max_height {
                    rects.push(Rect::new(self.cells[down].rect.bottom_left(), tr));
                    if h < max_height {
                        down = match self.cells[down].bottom {
                            Some(b) => b,
                            None => unreachable!("column shorter than its height"),
                        };
                    }
                }
                left = self.cells[l].left;
            }
        }
        rects
    }

    /// The number of rectangles [`CellGraph::all_rects`] would return,
    /// without materializing them.
    pub fn count_all_rects(&self) -> usize {
        let heights = self.heights();
        let mut count = 0;
        for (i, _) in self.cells.iter() {
            let mut max_height = heights[i];
            let mut left = Some(i);
            while let Some(l) = left {
                max_height = max_height.min(heights[l]);
                count += max_height + 1;
                left = self.cells[l].left;
            }
        }
        count
    }

    /// All maximal rectangles: unions of cells that cannot be extended in
    /// any direction and still be a union of cells.
    pub fn maximal_rects(&self) -> Vec<Rect> {
        let heights = self.heights();
        let mut rects = BTreeSet::new();
        for (i, cell) in self.cells.iter() {
            if cell.top.is_some() {
                continue;
            }
            for h in 0..=heights[i] {
                let mut left = i;
                let mut right = i;
                let mut min_height = heights[i];
                while let Some(l) = self.cells[left].left {
                    if heights[l] < h {
                        break;
                    }
                    min_height = min_height.min(heights[l]);
                    left = l;
                }
                while let Some(r) = self.cells[right].right {
                    if heights[r] < h {
                        break;
                    }
                    min_height = min_height.min(heights[r]);
                    right = r;
                }
                if min_height == h {
                    // Capped on both sides at exactly this height, so the
                    // strip cannot grow downwards either.
                    let mut bottom_left = left;
                    for _ in 0..h {
                        bottom_left = match self.cells[bottom_left].bottom {
                            Some(b) => b,
                            None => unreachable!("column shorter than its height"),
                        };
                    }
                    rects.insert(Rect::new(
                        self.cells[bottom_left].rect.bottom_left(),
                        self.cells[right].rect.top_right(),
                    ));
                }
            }
        }
        rects.into_iter().collect()
    }

    /// All rectangles that are unions of cells and lie inside `bounds`.
    ///
    /// `bounds` must itself be a union of cells. This enumeration feeds
    /// exact backends that restrict their search to a window of the region.
    pub fn rects_within(&self, bounds: &Rect) -> Vec<Rect> {
        let within: Vec<CellIdx> = self.cells_within(bounds).collect();
        let mut rects = Vec::new();
        for (k, &i) in within.iter().enumerate() {
            let tr = self.cells[i].rect.top_right();
            for &j in &within[k..] {
                let bl = self.cells[j].rect.bottom_left();
                if bl.y < tr.y {
                    rects.push(Rect::new(bl, tr));
                }
            }
        }
        rects
    }
}

/// Iterator over the cells contained in a rectangle; see
/// [`CellGraph::cells_within`].
///
/// The walk goes down a column of cells, then rewinds to the column top and
/// steps left to the next column. It borrows the cell arena and only moves
/// indices around.
pub struct CellsWithin<'a> {
    cells: &'a CellVec<Cell>,
    bottom_left: Point,
    /// Current column top and current cell, or `None` when exhausted.
    cursor: Option<(CellIdx, CellIdx)>,
}

impl Iterator for CellsWithin<'_> {
    type Item = CellIdx;

    fn next(&mut self) -> Option<CellIdx> {
        let (column, current) = self.cursor?;
        let cell = &self.cells[current];
        self.cursor = match cell.bottom {
            Some(down) if cell.rect.bottom_left().y > self.bottom_left.y => Some((column, down)),
            _ => {
                let top = &self.cells[column];
                match top.left {
                    Some(left) if top.rect.bottom_left().x > self.bottom_left.x => {
                        Some((left, left))
                    }
                    _ => None,
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Coord;
    use crate::polygon::Ring;

    fn poly(outer: &[(Coord, Coord)]) -> PolygonWithHoles {
        let ring = Ring::new(outer.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap();
        PolygonWithHoles::simple(ring).unwrap()
    }

    fn l_shape() -> PolygonWithHoles {
        poly(&[(0, 0), (10, 0), (10, 4), (4, 4), (4, 10), (0, 10)])
    }

    #[test]
    fn l_shape_cells_and_links() {
        let graph = CellGraph::from_polygon(&l_shape());
        assert_eq!(graph.len(), 3);

        // Sorted by top-left corner: the upper arm, the corner square, the
        // lower arm.
        let cells = graph.cells();
        assert_eq!(cells[CellIdx(0)].rect, Rect::from_coords(0, 4, 4, 10));
        assert_eq!(cells[CellIdx(1)].rect, Rect::from_coords(0, 0, 4, 4));
        assert_eq!(cells[CellIdx(2)].rect, Rect::from_coords(4, 0, 10, 4));

        assert_eq!(cells[CellIdx(0)].bottom, Some(CellIdx(1)));
        assert_eq!(cells[CellIdx(1)].top, Some(CellIdx(0)));
        assert_eq!(cells[CellIdx(1)].right, Some(CellIdx(2)));
        assert_eq!(cells[CellIdx(2)].left, Some(CellIdx(1)));
        assert_eq!(cells[CellIdx(0)].left, None);
        assert_eq!(cells[CellIdx(2)].top, None);
    }

    #[test]
    fn l_shape_heights() {
        let graph = CellGraph::from_polygon(&l_shape());
        let heights = graph.heights();
        let by_rect: Vec<usize> = graph.cells().iter().map(|(i, _)| heights[i]).collect();
        assert_eq!(by_rect, vec![1, 0, 0]);
    }

    #[test]
    fn l_shape_super_rectangles() {
        let graph = CellGraph::from_polygon(&l_shape());
        let mut rects = graph.all_rects();
        assert_eq!(rects.len(), graph.count_all_rects());
        rects.sort();
        assert_eq!(
            rects,
            vec![
                Rect::from_coords(0, 0, 4, 4),
                Rect::from_coords(0, 0, 4, 10),
                Rect::from_coords(0, 0, 10, 4),
                Rect::from_coords(0, 4, 4, 10),
                Rect::from_coords(4, 0, 10, 4),
            ]
        );
    }

    #[test]
    fn l_shape_maximal_rectangles() {
        let graph = CellGraph::from_polygon(&l_shape());
        assert_eq!(
            graph.maximal_rects(),
            vec![
                Rect::from_coords(0, 0, 4, 10),
                Rect::from_coords(0, 0, 10, 4),
            ]
        );
    }

    #[test]
    fn cells_within_walks_the_whole_bounds() {
        let graph = CellGraph::from_polygon(&l_shape());
        let bounds = Rect::from_coords(0, 0, 4, 10);
        let cells: Vec<Rect> = graph
            .cells_within(&bounds)
            .map(|i| graph.cells()[i].rect)
            .collect();
        assert_eq!(
            cells,
            vec![
                Rect::from_coords(0, 4, 4, 10),
                Rect::from_coords(0, 0, 4, 4),
            ]
        );

        let all: Vec<CellIdx> = graph
            .cells_within(&Rect::from_coords(0, 0, 10, 4))
            .collect();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn rects_within_enumerates_cell_unions() {
        let graph = CellGraph::from_polygon(&l_shape());
        let bounds = Rect::from_coords(0, 0, 4, 10);
        let mut rects = graph.rects_within(&bounds);
        rects.sort();
        assert_eq!(
            rects,
            vec![
                Rect::from_coords(0, 0, 4, 4),
                Rect::from_coords(0, 0, 4, 10),
                Rect::from_coords(0, 4, 4, 10),
            ]
        );
    }

    #[test]
    fn staircase_cells_partition_the_region() {
        // Two steps up and to the right.
        let p = poly(&[(0, 0), (2, 0), (2, 2), (4, 2), (4, 4), (0, 4)]);
        let cells = base_cells(&p);
        let total: u64 = cells.iter().map(Rect::area).sum();
        assert_eq!(total, p.area());
    }
}
