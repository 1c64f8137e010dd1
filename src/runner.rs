//! Drive a provider over a multi-polygon and collect per-polygon results.

use std::time::Instant;

use crate::polygon::PolygonWithHoles;
use crate::provider::{Provider, RuntimeState};
use crate::verify::verify_by_union;
use crate::{CostBreakdown, Costs, Cover};

/// Whether and how a cover was checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Validity {
    /// Verified and correct.
    Valid,
    /// Verified and wrong.
    Invalid,
    /// Verification was not requested.
    Unchecked,
    /// The backend hit its time budget; the cover is meaningless.
    Timeout,
}

/// The outcome for a single polygon.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PolygonResult {
    /// The computed cover.
    pub cover: Cover,
    /// Number of rectangles in the cover.
    pub cover_size: usize,
    /// Its cost, split into creation and area parts.
    pub cost: CostBreakdown,
    /// Time spent computing (not verifying) the cover.
    pub execution_time_ns: u128,
    /// Verification outcome.
    pub validity: Validity,
}

/// Aggregate over all polygons of a run.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct RunTotals {
    /// Summed cover sizes.
    pub cover_size: usize,
    /// Summed costs.
    pub cost: CostBreakdown,
    /// Summed execution times.
    pub execution_time_ns: u128,
    /// Worst validity over all polygons: any `Invalid` dominates, then any
    /// `Timeout`.
    pub validity: Validity,
    /// Polygons actually covered.
    pub processed: usize,
    /// Trivial rectangles skipped.
    pub skipped: usize,
}

/// Everything a run produced; serializable for external result writers.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Report {
    /// The aggregate row.
    pub total: RunTotals,
    /// One entry per processed polygon, in input order.
    pub polygons: Vec<PolygonResult>,
}

impl Report {
    /// Driver exit status: bit 0 set when any polygon's cover was invalid,
    /// bit 1 set when any polygon timed out.
    pub fn exit_bits(&self) -> i32 {
        let mut bits = 0;
        for result in &self.polygons {
            match result.validity {
                Validity::Invalid => bits |= 1,
                Validity::Timeout => bits |= 2,
                Validity::Valid | Validity::Unchecked => {}
            }
        }
        bits
    }
}

/// Run `provider` over every polygon, sequentially.
///
/// Polygons that are plain rectangles are skipped and only counted.
/// Each remaining polygon gets a fresh [`RuntimeState`]; the time spent in
/// the provider is measured per polygon, verification time is not counted.
pub fn run(
    provider: &Provider,
    polygons: &[PolygonWithHoles],
    costs: &Costs,
    verify: bool,
) -> Report {
    let mut total = RunTotals {
        cover_size: 0,
        cost: CostBreakdown::default(),
        execution_time_ns: 0,
        validity: if verify {
            Validity::Valid
        } else {
            Validity::Unchecked
        },
        processed: 0,
        skipped: 0,
    };
    let mut results = Vec::new();
    let mut state = RuntimeState::new();

    for polygon in polygons {
        if polygon.is_trivial_rectangle() {
            total.skipped += 1;
            continue;
        }
        state.clear();

        let start = Instant::now();
        let cover = provider.get_cover_for(polygon, costs, &mut state);
        let execution_time_ns = start.elapsed().as_nanos();

        let validity = if provider.timed_out() {
            Validity::Timeout
        } else if verify {
            if verify_by_union(&cover, polygon) {
                Validity::Valid
            } else {
                Validity::Invalid
            }
        } else {
            Validity::Unchecked
        };

        total.cover_size += cover.len();
        total.cost += costs.cover_breakdown(&cover);
        total.execution_time_ns += execution_time_ns;
        total.processed += 1;
        match validity {
            Validity::Invalid => total.validity = Validity::Invalid,
            Validity::Timeout if total.validity != Validity::Invalid => {
                total.validity = Validity::Timeout
            }
            _ => {}
        }

        results.push(PolygonResult {
            cover_size: cover.len(),
            cost: costs.cover_breakdown(&cover),
            execution_time_ns,
            validity,
            cover,
        });
    }

    Report {
        total,
        polygons: results,
    }
}
