//! Greedy weighted set cover over all cell-union rectangles.

use crate::geom::Rect;
use crate::polygon::PolygonWithHoles;
use crate::provider::RuntimeState;
use crate::{Costs, Cover};

/// One candidate rectangle in the greedy queue.
///
/// `effective_area` is the area the candidate would newly cover, given
/// everything picked so far; `cost_per_unit` is kept in sync with it.
struct QueueEntry {
    rect: Rect,
    area: u64,
    effective_area: u64,
    cost: u64,
    cost_per_unit: f64,
}

impl QueueEntry {
    fn new(rect: Rect, costs: &Costs) -> Self {
        let area = rect.area();
        let cost = costs.rect_cost(&rect);
        QueueEntry {
            rect,
            area,
            effective_area: area,
            cost,
            cost_per_unit: cost as f64 / area as f64,
        }
    }

    /// Account for `picked` having been added to the cover, where
    /// `newly_covered` are the cells it covered first.
    fn update(&mut self, picked: &Rect, newly_covered: &[Rect]) {
        if !picked.intersects(&self.rect) {
            return;
        }
        if picked.contains(&self.rect) {
            self.effective_area = 0;
            return;
        }
        for cell in newly_covered {
            if self.rect.contains(cell) {
                debug_assert!(self.effective_area >= cell.area());
                self.effective_area -= cell.area();
            }
        }
        if self.effective_area > 0 {
            self.cost_per_unit = self.cost as f64 / self.effective_area as f64;
        }
    }
}

/// Cover `polygon` greedily: repeatedly add the candidate with the best
/// cost per newly-covered unit.
///
/// The very first pick is the candidate of maximum raw area (the first such
/// candidate in enumeration order), which guarantees progress even when all
/// costs are zero. Later picks take the smallest `cost_per_unit`, breaking
/// ties toward the larger remaining area.
pub(crate) fn greedy_cover(
    polygon: &PolygonWithHoles,
    costs: &Costs,
    state: &mut RuntimeState,
) -> Cover {
    state.ensure_graph(polygon);
    let graph = &state.graph;
    let cells = graph.cells();

    let mut queue: Vec<QueueEntry> = graph
        .all_rects()
        .into_iter()
        .map(|rect| QueueEntry::new(rect, costs))
        .collect();

    // First index of maximum area.
    let mut best = 0;
    for (i, entry) in queue.iter().enumerate() {
        if entry.area > queue[best].area {
            best = i;
        }
    }

    let mut cover = Vec::new();
    let mut covered = vec![false; cells.len()];
    let mut covered_count = 0usize;

    loop {
        let picked = queue.swap_remove(best).rect;

        let mut newly_covered = Vec::new();
        for idx in graph.cells_within(&picked) {
            if !covered[idx.0] {
                covered[idx.0] = true;
                covered_count += 1;
                newly_covered.push(cells[idx].rect);
            }
        }
        debug_assert!(!newly_covered.is_empty());
        cover.push(picked);

        if covered_count == cells.len() {
            return cover;
        }

        // Update the survivors and find the next pick in one sweep,
        // compacting exhausted entries away.
        best = 0;
        let mut best_cost = f64::INFINITY;
        let mut best_area = 0u64;
        let mut i = 0;
        while i < queue.len() {
            queue[i].update(&picked, &newly_covered);
            if queue[i].effective_area == 0 {
                queue.swap_remove(i);
                continue;
            }
            let entry = &queue[i];
            if entry.cost_per_unit < best_cost
                || (entry.cost_per_unit == best_cost && entry.effective_area > best_area)
            {
                best = i;
                best_cost = entry.cost_per_unit;
                best_area = entry.effective_area;
            }
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Coord, Point};
    use crate::polygon::Ring;

    fn poly(outer: &[(Coord, Coord)]) -> PolygonWithHoles {
        let ring = Ring::new(outer.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap();
        PolygonWithHoles::simple(ring).unwrap()
    }

    #[test]
    fn l_shape_seeds_with_the_biggest_rectangle() {
        let p = poly(&[(0, 0), (10, 0), (10, 4), (4, 4), (4, 10), (0, 10)]);
        let cover = greedy_cover(&p, &Costs { creation: 0, area: 1 }, &mut RuntimeState::new());
        // The first candidate of maximum area (40) is the left arm.
        assert_eq!(cover[0], Rect::from_coords(0, 0, 4, 10));
        assert!(crate::verify_by_union(&cover, &p));
    }

    #[test]
    fn zero_costs_still_make_progress() {
        let p = poly(&[(0, 0), (10, 0), (10, 4), (4, 4), (4, 10), (0, 10)]);
        let cover = greedy_cover(&p, &Costs { creation: 0, area: 0 }, &mut RuntimeState::new());
        assert!(crate::verify_by_union(&cover, &p));
    }
}
