//! Remove fully redundant rectangles from a cover.

use crate::polygon::PolygonWithHoles;
use crate::provider::RuntimeState;
use crate::Cover;

/// Remove every rectangle all of whose cells are covered at least twice.
///
/// Removals only decrement multiplicities, so a rectangle that is not fully
/// redundant can never become redundant later; one pass with swap-removal
/// is enough.
pub(crate) fn prune_cover(cover: &mut Cover, polygon: &PolygonWithHoles, state: &mut RuntimeState) {
    state.ensure_coverage(polygon, cover);
    let RuntimeState {
        graph, coverage, ..
    } = state;

    let mut i = 0;
    while i < cover.len() {
        let rect = cover[i];
        let mut redundant = true;
        for idx in graph.cells_within(&rect) {
            debug_assert!(coverage[idx] > 0);
            if coverage[idx] == 1 {
                redundant = false;
                break;
            }
        }
        if redundant {
            for idx in graph.cells_within(&rect) {
                debug_assert!(coverage[idx] > 1);
                coverage[idx] -= 1;
            }
            cover.swap_remove(i);
        } else {
            i += 1;
        }
    }
}
