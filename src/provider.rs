//! Cover providers: the covering algorithms, postprocessor wrappers, and
//! the per-polygon state they share.

use std::str::FromStr;

use crate::geom::Rect;
use crate::grid::{base_cells, CellGraph, CellVec};
use crate::polygon::PolygonWithHoles;
use crate::{greedy, partition, post, strip, Costs, Cover};

/// Per-polygon scratch state shared along a provider chain.
///
/// The base cells, their graph and the per-cell coverage multiplicities are
/// computed at most once per polygon; empty containers mean "not computed
/// yet". The driver owns one of these, clears it between polygons, and
/// passes it down the chain by mutable reference.
#[derive(Debug, Default)]
pub struct RuntimeState {
    /// The base cells of the current polygon.
    pub base_cells: Vec<Rect>,
    /// The grid graph over those cells.
    pub graph: CellGraph,
    /// For each cell, how many rectangles of the current cover contain it.
    pub coverage: CellVec<u32>,
}

impl RuntimeState {
    /// Fresh, empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; call between polygons.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn ensure_cells(&mut self, polygon: &PolygonWithHoles) {
        if self.base_cells.is_empty() {
            self.base_cells = base_cells(polygon);
        }
    }

    pub(crate) fn ensure_graph(&mut self, polygon: &PolygonWithHoles) {
        if self.graph.is_empty() {
            self.ensure_cells(polygon);
            self.graph = CellGraph::build(self.base_cells.clone());
        }
    }

    /// Make sure `coverage` reflects `cover`, rebuilding it if some earlier
    /// step invalidated it.
    pub(crate) fn ensure_coverage(&mut self, polygon: &PolygonWithHoles, cover: &[Rect]) {
        if !self.coverage.is_empty() {
            return;
        }
        self.ensure_graph(polygon);
        let mut coverage = CellVec::with_size(self.graph.len());
        for rect in cover {
            for idx in self.graph.cells_within(rect) {
                debug_assert!(rect.contains(&self.graph.cells()[idx].rect));
                coverage[idx] += 1;
            }
        }
        self.coverage = coverage;
    }

    /// Drop the coverage multiplicities after a transformation that changed
    /// rectangle geometry without updating them.
    pub(crate) fn invalidate_coverage(&mut self) {
        self.coverage = CellVec::default();
    }
}

/// The built-in covering algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Weighted greedy set cover over all cell-union rectangles.
    Greedy,
    /// Maximal horizontal strips.
    Strip,
    /// Rectangle partition via good diagonals and a maximum matching.
    Partition,
}

impl Algorithm {
    fn run(&self, polygon: &PolygonWithHoles, costs: &Costs, state: &mut RuntimeState) -> Cover {
        match self {
            Algorithm::Greedy => greedy::greedy_cover(polygon, costs, state),
            Algorithm::Strip => strip::strip_cover(polygon, state),
            Algorithm::Partition => partition::partition_cover(polygon),
        }
    }
}

/// The cover postprocessors.
///
/// Each consumes a cover and rewrites it in place, never increasing its
/// cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Postprocessor {
    /// Remove rectangles all of whose cells are covered elsewhere.
    Prune,
    /// Shrink rectangle borders that are covered elsewhere.
    ///
    /// Assumes no rectangle is fully redundant; run [`Postprocessor::Prune`]
    /// first.
    Trim,
    /// Merge aligned, adjacent rectangle pairs when cheaper.
    Join,
    /// Merge arbitrary rectangle pairs when cheaper.
    JoinFull,
    /// Replace a rectangle by the bounding boxes of its uniquely-covered
    /// parts when cheaper.
    BboxSplit,
    /// Replace a rectangle by a partition of its uniquely-covered parts when
    /// cheaper.
    PartitionSplit,
}

impl Postprocessor {
    /// Rewrite `cover` in place.
    ///
    /// `state` must belong to `polygon` and reflect any earlier steps on
    /// this cover; a fresh state works too and is filled on demand.
    pub fn apply(
        &self,
        cover: &mut Cover,
        polygon: &PolygonWithHoles,
        costs: &Costs,
        state: &mut RuntimeState,
    ) {
        match self {
            Postprocessor::Prune => post::prune::prune_cover(cover, polygon, state),
            Postprocessor::Trim => post::trim::trim_cover(cover, polygon, state),
            Postprocessor::Join => post::join::join_cover(cover, polygon, costs, state),
            Postprocessor::JoinFull => post::join_full::join_full_cover(cover, polygon, costs, state),
            Postprocessor::BboxSplit => {
                post::split::split_cover(cover, polygon, costs, state, post::split::Splitter::Bbox)
            }
            Postprocessor::PartitionSplit => post::split::split_cover(
                cover,
                polygon,
                costs,
                state,
                post::split::Splitter::Partition,
            ),
        }
    }
}

/// A provider is an algorithm, possibly wrapped in a chain of
/// postprocessors.
///
/// ```
/// use rectcover::{Algorithm, Postprocessor, Provider};
///
/// let provider = Provider::algorithm(Algorithm::Strip)
///     .then(Postprocessor::Prune)
///     .then(Postprocessor::Trim);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    /// A bare algorithm.
    Algorithm(Algorithm),
    /// A provider followed by one postprocessing step.
    Wrapped(Box<Provider>, Postprocessor),
}

impl Provider {
    /// A provider running `algorithm` with no postprocessing.
    pub fn algorithm(algorithm: Algorithm) -> Provider {
        Provider::Algorithm(algorithm)
    }

    /// Append a postprocessing step.
    pub fn then(self, postprocessor: Postprocessor) -> Provider {
        Provider::Wrapped(Box::new(self), postprocessor)
    }

    /// Compute a cover of `polygon`.
    ///
    /// `state` must belong to this polygon; the provider chain reads and
    /// extends its cached decomposition and coverage data.
    pub fn get_cover_for(
        &self,
        polygon: &PolygonWithHoles,
        costs: &Costs,
        state: &mut RuntimeState,
    ) -> Cover {
        match self {
            Provider::Algorithm(algorithm) => algorithm.run(polygon, costs, state),
            Provider::Wrapped(previous, postprocessor) => {
                let mut cover = previous.get_cover_for(polygon, costs, state);
                postprocessor.apply(&mut cover, polygon, costs, state);
                cover
            }
        }
    }

    /// Did the innermost backend stop because of its time budget?
    ///
    /// The built-in algorithms always run to completion; only exact external
    /// backends produce timeouts, and drivers wrapping one should consult it
    /// here.
    pub fn timed_out(&self) -> bool {
        false
    }
}

/// The name given to [`Algorithm::from_str`] or [`Postprocessor::from_str`]
/// was not recognized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownProviderName;

impl std::fmt::Display for UnknownProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("unknown algorithm or postprocessor name")
    }
}

impl std::error::Error for UnknownProviderName {}

impl FromStr for Algorithm {
    type Err = UnknownProviderName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(Algorithm::Greedy),
            "strip" => Ok(Algorithm::Strip),
            "partition" => Ok(Algorithm::Partition),
            _ => Err(UnknownProviderName),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Algorithm::Greedy => "greedy",
            Algorithm::Strip => "strip",
            Algorithm::Partition => "partition",
        })
    }
}

impl FromStr for Postprocessor {
    type Err = UnknownProviderName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prune" => Ok(Postprocessor::Prune),
            "trim" => Ok(Postprocessor::Trim),
            "join" => Ok(Postprocessor::Join),
            "join-full" => Ok(Postprocessor::JoinFull),
            "bbox-split" => Ok(Postprocessor::BboxSplit),
            "partition-split" => Ok(Postprocessor::PartitionSplit),
            _ => Err(UnknownProviderName),
        }
    }
}

impl std::fmt::Display for Postprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Postprocessor::Prune => "prune",
            Postprocessor::Trim => "trim",
            Postprocessor::Join => "join",
            Postprocessor::JoinFull => "join-full",
            Postprocessor::BboxSplit => "bbox-split",
            Postprocessor::PartitionSplit => "partition-split",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for algorithm in [Algorithm::Greedy, Algorithm::Strip, Algorithm::Partition] {
            assert_eq!(algorithm.to_string().parse(), Ok(algorithm));
        }
        for postprocessor in [
            Postprocessor::Prune,
            Postprocessor::Trim,
            Postprocessor::Join,
            Postprocessor::JoinFull,
            Postprocessor::BboxSplit,
            Postprocessor::PartitionSplit,
        ] {
            assert_eq!(postprocessor.to_string().parse(), Ok(postprocessor));
        }
        assert!("ilp".parse::<Algorithm>().is_err());
    }
}
