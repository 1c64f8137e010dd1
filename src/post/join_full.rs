//! Merge arbitrary rectangle pairs when the merge is cheaper.

use crate::geom::Rect;
use crate::polygon::PolygonWithHoles;
use crate::post::fits_region;
use crate::provider::RuntimeState;
use crate::{Costs, Cover};

/// Join any two rectangles, aligned or not, into their bounding box when
/// that is cheaper than the pair.
///
/// For each rectangle, the partner maximizing the cost reduction is chosen
/// (first-found on ties); after a join the scan restarts from the front, so
/// a merged rectangle can merge again.
pub(crate) fn join_full_cover(
    cover: &mut Cover,
    polygon: &PolygonWithHoles,
    costs: &Costs,
    state: &mut RuntimeState,
) {
    let mut changed = false;
    let mut i = 0;
    while i < cover.len() {
        let mut best: Option<(usize, Rect, u64)> = None;
        for j in (i + 1)..cover.len() {
            let joined = cover[i].join(&cover[j]);
            let pair_cost = costs.rect_cost(&cover[i]) + costs.rect_cost(&cover[j]);
            let joined_cost = costs.rect_cost(&joined);
            if joined_cost >= pair_cost {
                continue;
            }
            let reduction = pair_cost - joined_cost;
            if best.as_ref().is_some_and(|&(_, _, r)| r >= reduction) {
                continue;
            }
            if !fits_region(polygon, &joined) {
                continue;
            }
            best = Some((j, joined, reduction));
        }
        if let Some((j, joined, _)) = best {
            cover.remove(j);
            cover.remove(i);
            cover.push(joined);
            changed = true;
            i = 0;
        } else {
            i += 1;
        }
    }

    if changed {
        state.invalidate_coverage();
    }
}
