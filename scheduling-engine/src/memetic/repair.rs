//! Local repair, min-conflicts style (spec §4.8.1): run once per
//! generation on non-elite candidates, and once more on the best
//! schedule after the memetic loop ends. Every step here only ever
//! touches unpinned cells.

use rand::Rng;

use shared::{Employee, ManualPins, Schedule, Settings, ShiftCode};

use crate::calendar::CalendarModel;
use crate::fitness::{self, FitnessReport};
use crate::initializer;
use crate::memetic::Cancellation;
use crate::rules;

pub fn run(
    schedule: &mut Schedule,
    calendar: &CalendarModel,
    employees: &[Employee],
    pins: &ManualPins,
    settings: &Settings,
    max_steps: usize,
    cancellation: &dyn Cancellation,
    rng: &mut impl Rng,
) -> FitnessReport {
    let mut report = fitness::evaluate(schedule, calendar, employees, pins, settings);

    for _ in 0..max_steps {
        if report.score == 0 || cancellation.is_cancelled() {
            break;
        }
        reconcile_prd(schedule, calendar, employees, pins, settings);
        fill_empty_cells(schedule, employees, pins, settings, rng);
        repair_long_runs(schedule, employees, pins);
        break_v6_adjacency(schedule, employees, pins, settings, rng);
        improve_random_cell(schedule, calendar, employees, pins, settings, rng);

        report = fitness::evaluate(schedule, calendar, employees, pins, settings);
    }

    report
}

fn is_pinned(pins: &ManualPins, employee: &shared::EmployeeId, day: usize) -> bool {
    pins.contains_key(&(employee.clone(), day))
}

/// Step a: reconcile PRD count against the Sunday count, working entirely
/// on unpinned cells.
fn reconcile_prd(
    schedule: &mut Schedule,
    calendar: &CalendarModel,
    employees: &[Employee],
    pins: &ManualPins,
    settings: &Settings,
) {
    let days = calendar.day_count();
    let sundays = calendar.sunday_count();

    for employee in employees {
        // Drop forbidden, unpinned PRDs.
        for day in 0..days {
            if is_pinned(pins, &employee.id, day) {
                continue;
            }
            let is_prd = schedule.get(&employee.id, day).map(|c| c.is_prd()).unwrap_or(false);
            if is_prd && calendar.day(day).map(|d| d.is_prd_forbidden).unwrap_or(false) {
                schedule.set(&employee.id, day, None);
            }
        }

        let current = (0..days)
            .filter(|&d| schedule.get(&employee.id, d).map(|c| c.is_prd()).unwrap_or(false))
            .count();

        if current < sundays {
            let needed = sundays - current;
            let mut candidates: Vec<usize> = (0..days)
                .filter(|&d| !is_pinned(pins, &employee.id, d))
                .filter(|&d| !calendar.day(d).map(|cd| cd.is_prd_forbidden).unwrap_or(true))
                .filter(|&d| neighbours_not_off(schedule, &employee.id, d))
                .filter(|&d| run_stays_legal(schedule, &employee.id, d, days))
                .collect();
            candidates.sort_by_key(|&d| daily_prd_load(schedule, employees, d));
            for day in candidates.into_iter().take(needed) {
                schedule.set(&employee.id, day, Some(ShiftCode::prd()));
            }
        } else if current > sundays {
            let mut excess = current - sundays;
            let removable: Vec<usize> = (0..days)
                .filter(|&d| !is_pinned(pins, &employee.id, d))
                .filter(|&d| schedule.get(&employee.id, d).map(|c| c.is_prd()).unwrap_or(false))
                .collect();
            let pool = initializer::draw_pool(employee.rank, settings);
            for day in removable {
                if excess == 0 {
                    break;
                }
                if !pool.is_empty() {
                    schedule.set(&employee.id, day, Some(pool[0].clone()));
                } else {
                    schedule.set(&employee.id, day, None);
                }
                excess -= 1;
            }
        }
    }
}

fn neighbours_not_off(schedule: &Schedule, employee: &shared::EmployeeId, day: usize) -> bool {
    let prev_off = day
        .checked_sub(1)
        .and_then(|d| schedule.get(employee, d))
        .map(|c| c.is_off_marker())
        .unwrap_or(false);
    let next_off = schedule.get(employee, day + 1).map(|c| c.is_off_marker()).unwrap_or(false);
    !prev_off && !next_off
}

fn run_stays_legal(schedule: &Schedule, employee: &shared::EmployeeId, day: usize, days: usize) -> bool {
    let row: Vec<Option<ShiftCode>> = (0..days).map(|d| schedule.get(employee, d).cloned()).collect();
    !rules::creates_run_over_7(&row, day, &ShiftCode::prd())
}

fn daily_prd_load(schedule: &Schedule, employees: &[Employee], day: usize) -> usize {
    employees
        .iter()
        .filter(|e| schedule.get(&e.id, day).map(|c| c.is_prd()).unwrap_or(false))
        .count()
}

/// Step b: fill any remaining empty, unpinned cells.
fn fill_empty_cells(schedule: &mut Schedule, employees: &[Employee], pins: &ManualPins, settings: &Settings, rng: &mut impl Rng) {
    for employee in employees {
        let pool = initializer::draw_pool(employee.rank, settings);
        if pool.is_empty() {
            continue;
        }
        let days = schedule.row(&employee.id).map(|r| r.len()).unwrap_or(0);
        for day in 0..days {
            if is_pinned(pins, &employee.id, day) {
                continue;
            }
            if schedule.get(&employee.id, day).is_none() {
                let choice = pool[rng.gen_range(0..pool.len())].clone();
                schedule.set(&employee.id, day, Some(choice));
            }
        }
    }
}

/// Step c: overwrite the 8th consecutive working day of an over-length
/// run with PRD, when that day is unpinned.
fn repair_long_runs(schedule: &mut Schedule, employees: &[Employee], pins: &ManualPins) {
    for employee in employees {
        let days = schedule.row(&employee.id).map(|r| r.len()).unwrap_or(0);
        let mut run = 0usize;
        for day in 0..days {
            let working = schedule.get(&employee.id, day).map(|c| !c.is_off_marker()).unwrap_or(false);
            if working {
                run += 1;
                if run == 8 && !is_pinned(pins, &employee.id, day) {
                    schedule.set(&employee.id, day, Some(ShiftCode::prd()));
                    run = 0;
                }
            } else {
                run = 0;
            }
        }
    }
}

/// Step d: break a V6-V6 adjacency by overwriting one (unpinned) side
/// with any non-V6 rank-allowed shift.
fn break_v6_adjacency(schedule: &mut Schedule, employees: &[Employee], pins: &ManualPins, settings: &Settings, rng: &mut impl Rng) {
    for employee in employees {
        let pool: Vec<ShiftCode> = initializer::draw_pool(employee.rank, settings)
            .into_iter()
            .filter(|c| crate::catalogue::family(c) != Some(shared::ShiftFamily::V6))
            .collect();
        if pool.is_empty() {
            continue;
        }
        let days = schedule.row(&employee.id).map(|r| r.len()).unwrap_or(0);
        let mut day = 1;
        while day < days {
            let prev = schedule.get(&employee.id, day - 1).cloned();
            let cur = schedule.get(&employee.id, day).cloned();
            if rules::violates_v6_adjacency(prev.as_ref(), cur.as_ref()) {
                let choice = pool[rng.gen_range(0..pool.len())].clone();
                if !is_pinned(pins, &employee.id, day) {
                    schedule.set(&employee.id, day, Some(choice));
                } else if !is_pinned(pins, &employee.id, day - 1) {
                    schedule.set(&employee.id, day - 1, Some(choice));
                }
            }
            day += 1;
        }
    }
}

/// Step e: pick one random unpinned cell and try every rank-allowed
/// shift, keeping whichever minimises full-schedule fitness (ties keep
/// the current value).
fn improve_random_cell(
    schedule: &mut Schedule,
    calendar: &CalendarModel,
    employees: &[Employee],
    pins: &ManualPins,
    settings: &Settings,
    rng: &mut impl Rng,
) {
    if employees.is_empty() {
        return;
    }
    let employee = &employees[rng.gen_range(0..employees.len())];
    let days = calendar.day_count();
    let unpinned_days: Vec<usize> = (0..days).filter(|&d| !is_pinned(pins, &employee.id, d)).collect();
    if unpinned_days.is_empty() {
        return;
    }
    let day = unpinned_days[rng.gen_range(0..unpinned_days.len())];

    let pool = initializer::draw_pool(employee.rank, settings);
    if pool.is_empty() {
        return;
    }

    let original = schedule.get(&employee.id, day).cloned();
    let mut best_code = original.clone();
    let mut best_score = fitness::evaluate(schedule, calendar, employees, pins, settings).score;

    for candidate in &pool {
        schedule.set(&employee.id, day, Some(candidate.clone()));
        let score = fitness::evaluate(schedule, calendar, employees, pins, settings).score;
        if score < best_score {
            best_score = score;
            best_code = Some(candidate.clone());
        }
    }

    schedule.set(&employee.id, day, best_code);
}
