//! Merge aligned, adjacent rectangles when the merge is cheaper.

use std::collections::{BTreeMap, BTreeSet};

use crate::geom::Coord;
use crate::polygon::PolygonWithHoles;
use crate::post::fits_region;
use crate::provider::RuntimeState;
use crate::{Costs, Cover};

/// Join aligned rectangle pairs: first rectangles sharing the same vertical
/// extent (scanned left to right), then, on the updated cover, rectangles
/// sharing the same horizontal extent (scanned bottom to top).
///
/// Within an alignment class, joining is chained: in `a, b, c`, if `a` and
/// `b` merge, the merge is next tried against `c`. A proposed join is
/// accepted when it is strictly cheaper than the pair it replaces and no
/// boundary edge passes through it.
pub(crate) fn join_cover(
    cover: &mut Cover,
    polygon: &PolygonWithHoles,
    costs: &Costs,
    state: &mut RuntimeState,
) {
    // Horizontal runs: same (min_y, max_y), ordered by min_x.
    let mut classes: BTreeMap<(Coord, Coord), Vec<usize>> = BTreeMap::new();
    for (i, rect) in cover.iter().enumerate() {
        classes.entry((rect.min_y(), rect.max_y())).or_default().push(i);
    }
    for indices in classes.values_mut() {
        indices.sort_by_key(|&i| cover[i].min_x());
    }
    let mut changed = join_pass(cover, polygon, costs, classes.into_values());

    // Vertical runs on the updated cover: same (min_x, max_x), ordered by
    // min_y.
    let mut classes: BTreeMap<(Coord, Coord), Vec<usize>> = BTreeMap::new();
    for (i, rect) in cover.iter().enumerate() {
        classes.entry((rect.min_x(), rect.max_x())).or_default().push(i);
    }
    for indices in classes.values_mut() {
        indices.sort_by_key(|&i| cover[i].min_y());
    }
    changed |= join_pass(cover, polygon, costs, classes.into_values());

    if changed {
        // The multiplicities no longer describe the rewritten cover.
        state.invalidate_coverage();
    }
}

fn join_pass(
    cover: &mut Cover,
    polygon: &PolygonWithHoles,
    costs: &Costs,
    classes: impl Iterator<Item = Vec<usize>>,
) -> bool {
    let mut deleted: BTreeSet<usize> = BTreeSet::new();
    for indices in classes {
        if indices.len() <= 1 {
            continue;
        }
        let mut prev = indices[0];
        for &idx in &indices[1..] {
            let pair_cost = costs.rect_cost(&cover[prev]) + costs.rect_cost(&cover[idx]);
            let joined = cover[prev].join(&cover[idx]);
            if costs.rect_cost(&joined) < pair_cost && fits_region(polygon, &joined) {
                deleted.insert(prev);
                deleted.insert(idx);
                cover.push(joined);
                prev = cover.len() - 1;
            } else {
                prev = idx;
            }
        }
    }
    // Joined rectangles were appended past every deleted index, so removing
    // back to front keeps the remaining indices stable.
    for &idx in deleted.iter().rev() {
        cover.remove(idx);
    }
    !deleted.is_empty()
}
