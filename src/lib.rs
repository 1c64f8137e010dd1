#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

mod arrangement;
mod geom;
mod greedy;
mod grid;
mod matching;
mod partition;
mod polygon;
mod post;
mod provider;
mod runner;
mod strip;
mod verify;

#[cfg(any(test, feature = "generators"))]
pub mod generators;

pub use geom::{Coord, Dir, Point, Rect, Segment};
pub use grid::{base_cells, Cell, CellGraph, CellIdx, CellVec, CellsWithin};
pub use polygon::{concave_vertices, ConcaveMap, MultiPolygon, PolygonWithHoles, Ring};
pub use provider::{Algorithm, Postprocessor, Provider, RuntimeState, UnknownProviderName};
pub use runner::{run, PolygonResult, Report, RunTotals, Validity};
pub use verify::{verify_by_subtraction, verify_by_union};

/// A cover: rectangles whose union is the input region.
///
/// The same rectangle may appear more than once, and rectangles may overlap;
/// only the union matters for validity, while the cost is summed over all
/// entries.
pub type Cover = Vec<Rect>;

/// The input polygon was malformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// A boundary ring had fewer than four vertices.
    TooFewVertices,
    /// Two consecutive vertices coincide.
    ZeroLengthEdge,
    /// An edge is neither horizontal nor vertical.
    NonRectilinearEdge,
    /// A boundary crosses itself or another boundary.
    SelfIntersecting,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Error::TooFewVertices => "boundary ring has fewer than four vertices",
            Error::ZeroLengthEdge => "two consecutive vertices coincide",
            Error::NonRectilinearEdge => "edge is neither horizontal nor vertical",
            Error::SelfIntersecting => "boundary crosses itself or another boundary",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}

/// The two cost coefficients of a covering problem.
///
/// A rectangle costs `creation + area * rect_area`; a cover costs the sum
/// over its rectangles. Both coefficients may be zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Costs {
    /// Fixed cost per rectangle.
    pub creation: u64,
    /// Cost per unit of covered area (counting overlaps multiply).
    pub area: u64,
}

impl Costs {
    /// The total cost of a single rectangle.
    pub fn rect_cost(&self, rect: &Rect) -> u64 {
        self.creation + self.area * rect.area()
    }

    /// The total cost of a cover.
    pub fn cover_cost(&self, cover: &[Rect]) -> u64 {
        cover.iter().map(|r| self.rect_cost(r)).sum()
    }

    /// The cost of a single rectangle, split into its two parts.
    pub fn rect_breakdown(&self, rect: &Rect) -> CostBreakdown {
        CostBreakdown {
            creation: self.creation,
            area: self.area * rect.area(),
        }
    }

    /// The cost of a cover, split into its two parts.
    pub fn cover_breakdown(&self, cover: &[Rect]) -> CostBreakdown {
        let mut total = CostBreakdown::default();
        for rect in cover {
            total += self.rect_breakdown(rect);
        }
        total
    }
}

/// A cost split into its creation and area parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct CostBreakdown {
    /// Summed creation costs.
    pub creation: u64,
    /// Summed area costs.
    pub area: u64,
}

impl CostBreakdown {
    /// Creation and area parts combined.
    pub fn total(&self) -> u64 {
        self.creation + self.area
    }
}

impl std::ops::AddAssign for CostBreakdown {
    fn add_assign(&mut self, rhs: CostBreakdown) {
        self.creation += rhs.creation;
        self.area += rhs.area;
    }
}
