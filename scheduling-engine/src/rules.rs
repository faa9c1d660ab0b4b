//! Pure legality predicates shared by FixedAssigner (§4.4), PRDDistributor
//! (§4.5), the fitness evaluator (§4.6), and local repair (§4.8.1). None
//! of these ever fail — they are boolean probes, not fallible operations.

use shared::ShiftCode;

use crate::catalogue;

/// Hours between the end of `prev` and the start of `next`, treating the
/// two as adjacent points on a continuous clock so an end hour past 24
/// (wrapping into the next calendar day) shortens the gap correctly.
/// `None` if either side has no defined hours (an off marker).
pub fn gap_hours(prev: &ShiftCode, next: &ShiftCode) -> Option<f64> {
    let prev_end = catalogue::end_hour(prev)?;
    let next_start = catalogue::start_hour(next)?;
    Some(24.0 + next_start - prev_end)
}

pub fn violates_min_gap(prev: Option<&ShiftCode>, next: Option<&ShiftCode>) -> bool {
    match (prev, next) {
        (Some(p), Some(n)) => gap_hours(p, n).map(|gap| gap < 10.0).unwrap_or(false),
        _ => false,
    }
}

pub fn both_off(prev: Option<&ShiftCode>, next: Option<&ShiftCode>) -> bool {
    matches!((prev, next), (Some(p), Some(n)) if p.is_off_marker() && n.is_off_marker())
}

pub fn violates_vx_adjacency(prev: Option<&ShiftCode>, next: Option<&ShiftCode>) -> bool {
    use shared::ShiftFamily::Vx;
    matches!((prev, next), (Some(p), Some(n))
        if catalogue::family(p) == Some(Vx) && catalogue::family(n) == Some(Vx))
}

pub fn violates_v6_adjacency(prev: Option<&ShiftCode>, next: Option<&ShiftCode>) -> bool {
    use shared::ShiftFamily::V6;
    matches!((prev, next), (Some(p), Some(n))
        if catalogue::family(p) == Some(V6) && catalogue::family(n) == Some(V6))
}

/// Would placing `candidate` at `row[day]` create a contiguous working
/// run (non-off, non-empty days) longer than 7? Off markers never
/// contribute to a run; an off-marker candidate can never violate this.
pub fn creates_run_over_7(row: &[Option<ShiftCode>], day: usize, candidate: &ShiftCode) -> bool {
    if candidate.is_off_marker() {
        return false;
    }
    run_length_with(row, day, Some(candidate)) > 7
}

/// Length of the contiguous working run that includes `day`, as if
/// `row[day]` were `with` instead of whatever it currently holds.
pub fn run_length_with(row: &[Option<ShiftCode>], day: usize, with: Option<&ShiftCode>) -> usize {
    let is_working = |cell: Option<&ShiftCode>| -> bool {
        matches!(cell, Some(c) if !c.is_off_marker())
    };

    if !is_working(with) {
        return 0;
    }

    let mut run = 1usize;
    let mut d = day;
    while d > 0 {
        d -= 1;
        if is_working(row.get(d).and_then(|c| c.as_ref())) {
            run += 1;
        } else {
            break;
        }
    }
    let mut d = day;
    loop {
        d += 1;
        if is_working(row.get(d).and_then(|c| c.as_ref())) {
            run += 1;
        } else {
            break;
        }
    }
    run
}
