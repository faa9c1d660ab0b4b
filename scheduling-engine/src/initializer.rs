//! Initializer (spec §4.7): builds one candidate [`Schedule`] at a time.
//! Two named strategies, Random and Heuristic — as specified, both copy
//! pins first and then draw the remaining cells identically, so the
//! population-level difference is only in how the modes are *labelled*,
//! not in the draw itself; `modes_for_population` still keeps the two
//! named strategies roughly half-and-half per the population split.

use rand::Rng;

use shared::{Employee, ManualPins, Rank, Schedule, Settings, ShiftCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    Random,
    Heuristic,
}

/// Roughly half Random, half Heuristic, as spec §4.7 requires of the
/// initial population.
pub fn modes_for_population(size: usize) -> Vec<InitMode> {
    (0..size)
        .map(|i| if i % 2 == 0 { InitMode::Random } else { InitMode::Heuristic })
        .collect()
}

/// The rank-restricted draw pool for one employee: `selectedShifts` minus
/// the three off markers, further restricted to morning-start codes for
/// Senior/Manager (spec §9 Design Notes: a hard restriction at init and
/// mutation, deliberately not re-enforced in fitness).
pub fn draw_pool(rank: Rank, settings: &Settings) -> Vec<ShiftCode> {
    let mut pool: Vec<ShiftCode> =
        settings.selected_shifts.iter().filter(|c| !c.is_off_marker()).cloned().collect();
    if matches!(rank, Rank::Senior | Rank::Manager) {
        pool.retain(|c| crate::catalogue::is_morning(c));
    }
    pool
}

/// Builds one candidate schedule: pinned cells are copied verbatim,
/// everything else is drawn uniformly from [`draw_pool`]. `_mode` only
/// exists so callers can label the resulting candidate; see module docs.
pub fn build_candidate(
    _mode: InitMode,
    employees: &[Employee],
    days: usize,
    pins: &ManualPins,
    settings: &Settings,
    rng: &mut impl Rng,
) -> Schedule {
    let mut schedule = Schedule::empty(employees.iter().map(|e| e.id.clone()), days);

    for employee in employees {
        let pool = draw_pool(employee.rank, settings);
        for day in 0..days {
            if let Some(pin) = pins.get(&(employee.id.clone(), day)) {
                schedule.set(&employee.id, day, Some(pin.clone()));
                continue;
            }
            if pool.is_empty() {
                continue;
            }
            let choice = &pool[rng.gen_range(0..pool.len())];
            schedule.set(&employee.id, day, Some(choice.clone()));
        }
    }

    schedule
}
