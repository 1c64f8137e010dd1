//! Cover postprocessors: local, cost-non-increasing rewrites of a cover.
//!
//! All of them share the per-polygon [`RuntimeState`](crate::RuntimeState):
//! the cell graph is built at most once, and the per-cell coverage
//! multiplicities are either maintained exactly (prune, trim, the splitters)
//! or dropped for rebuilding (the joiners, which change rectangle geometry
//! wholesale).

pub(crate) mod join;
pub(crate) mod join_full;
pub(crate) mod prune;
pub(crate) mod split;
pub(crate) mod trim;

use crate::geom::Rect;
use crate::polygon::PolygonWithHoles;

/// Does `rect` avoid every boundary edge's interior?
///
/// Callers pass rectangles that contain cover rectangles, which are already
/// inside the region; for such rectangles, not crossing any boundary edge is
/// the same as lying inside the region.
pub(crate) fn fits_region(polygon: &PolygonWithHoles, rect: &Rect) -> bool {
    polygon.edges().all(|edge| !rect.fully_intersects(&edge))
}
