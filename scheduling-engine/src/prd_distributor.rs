//! PRDDistributor (spec §4.5): reconciles each employee's PRD count to
//! the month's Sunday count, writing the result into the pin table so
//! every population member the initializer builds inherits it.
//!
//! "Engine-placed" PRDs — ones this component (on a previous run over the
//! same persisted pin table) added rather than the operator — are the
//! only ones ever removed here; operator pins stay untouched no matter
//! what they violate, same authoritative guarantee as everywhere else.
//! The caller is expected to persist `engine_added` alongside the pin
//! table across runs so this distinction survives a reload.

use std::collections::{HashMap, HashSet};

use shared::{Employee, EmployeeId, ManualPins, ShiftCode};

use crate::calendar::CalendarModel;

pub struct PrdDistributorReport {
    pub message: String,
    pub employees_still_short: usize,
}

struct Timeline {
    rows: HashMap<EmployeeId, Vec<Option<ShiftCode>>>,
}

impl Timeline {
    fn new(employees: &[Employee], pins: &ManualPins, days: usize) -> Self {
        let mut rows: HashMap<EmployeeId, Vec<Option<ShiftCode>>> =
            employees.iter().map(|e| (e.id.clone(), vec![None; days])).collect();
        for ((emp, day), code) in pins.iter() {
            if let Some(row) = rows.get_mut(emp) {
                if *day < row.len() {
                    row[*day] = Some(code.clone());
                }
            }
        }
        Self { rows }
    }

    fn cell(&self, employee: &EmployeeId, day: usize) -> Option<&ShiftCode> {
        self.rows.get(employee)?.get(day)?.as_ref()
    }

    fn set(&mut self, employee: &EmployeeId, day: usize, code: Option<ShiftCode>) {
        if let Some(row) = self.rows.get_mut(employee) {
            if day < row.len() {
                row[day] = code;
            }
        }
    }

    fn prd_count(&self, employee: &EmployeeId) -> usize {
        self.rows
            .get(employee)
            .map(|row| row.iter().filter(|c| matches!(c, Some(s) if s.is_prd())).count())
            .unwrap_or(0)
    }
}

fn can_place_prd(calendar: &CalendarModel, timeline: &Timeline, employee: &EmployeeId, day: usize) -> bool {
    let Some(calendar_day) = calendar.day(day) else { return false };
    if calendar_day.is_prd_forbidden {
        return false;
    }
    if day > 0 {
        if let Some(prev) = timeline.cell(employee, day - 1) {
            if prev.is_off_marker() {
                return false;
            }
        }
    }
    if let Some(next) = timeline.cell(employee, day + 1) {
        if next.is_off_marker() {
            return false;
        }
    }
    let row = match timeline.rows.get(employee) {
        Some(r) => r,
        None => return false,
    };
    !crate::rules::creates_run_over_7(row, day, &ShiftCode::prd())
}

pub fn run(
    calendar: &CalendarModel,
    employees: &[Employee],
    pins: &mut ManualPins,
    engine_added: &mut HashSet<(EmployeeId, usize)>,
) -> PrdDistributorReport {
    let days = calendar.day_count();
    let mut timeline = Timeline::new(employees, pins, days);
    let sundays = calendar.sunday_count();
    let soft_cap = (employees.len() as f64 / 3.0).ceil() as usize;

    // Step 1: drop this component's own prior PRDs that are no longer legal.
    let previously_placed: Vec<(EmployeeId, usize)> = engine_added.iter().cloned().collect();
    for (emp, day) in previously_placed {
        let is_prd = timeline.cell(&emp, day).map(|c| c.is_prd()).unwrap_or(false);
        if is_prd && !can_place_prd(calendar, &timeline, &emp, day) {
            timeline.set(&emp, day, None);
            pins.remove(&(emp.clone(), day));
            engine_added.remove(&(emp, day));
        }
    }

    // Step 2/3: fill the shortfall, spreading placements across lightly-loaded days.
    let mut still_short = 0usize;
    for employee in employees {
        let needed = sundays.saturating_sub(timeline.prd_count(&employee.id));
        let mut placed = 0usize;

        for respect_cap in [true, false] {
            if placed >= needed {
                break;
            }
            let mut candidate_days: Vec<usize> = (0..days)
                .filter(|&d| timeline.cell(&employee.id, d).is_none())
                .filter(|&d| can_place_prd(calendar, &timeline, &employee.id, d))
                .filter(|&d| !respect_cap || daily_prd_load(&timeline, d) < soft_cap)
                .collect();
            candidate_days.sort_by_key(|&d| daily_prd_load(&timeline, d));

            for day in candidate_days {
                if placed >= needed {
                    break;
                }
                if timeline.cell(&employee.id, day).is_some() {
                    continue; // filled by an earlier iteration of this loop
                }
                timeline.set(&employee.id, day, Some(ShiftCode::prd()));
                pins.insert((employee.id.clone(), day), ShiftCode::prd());
                engine_added.insert((employee.id.clone(), day));
                placed += 1;
            }
        }

        if placed < needed {
            still_short += 1;
        }
    }

    PrdDistributorReport {
        message: format!(
            "PRDDistributor reconciled PRD counts against {sundays} Sunday(s) for {} employee(s); {still_short} still short of target",
            employees.len()
        ),
        employees_still_short: still_short,
    }
}

fn daily_prd_load(timeline: &Timeline, day: usize) -> usize {
    timeline
        .rows
        .values()
        .filter(|row| matches!(row.get(day), Some(Some(c)) if c.is_prd()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Department, Rank};

    fn employee(id: &str) -> Employee {
        Employee {
            id: EmployeeId::new(id).unwrap(),
            name: id.to_string(),
            rank: Rank::Junior,
            department: Department::Cashier,
        }
    }

    #[test]
    fn reconciles_prd_count_to_sundays() {
        let calendar = CalendarModel::new(2025, 3, &Default::default());
        let employees = vec![employee("e1")];
        let mut pins = ManualPins::new();
        let mut engine_added = HashSet::new();

        let report = run(&calendar, &employees, &mut pins, &mut engine_added);
        assert_eq!(report.employees_still_short, 0);

        let count = (0..calendar.day_count())
            .filter(|d| pins.get(&(employees[0].id.clone(), *d)).map(|c| c.is_prd()).unwrap_or(false))
            .count();
        assert_eq!(count, calendar.sunday_count());
    }

    #[test]
    fn never_places_prd_on_forbidden_day() {
        let calendar = CalendarModel::new(2025, 3, &Default::default());
        let employees = vec![employee("e1")];
        let mut pins = ManualPins::new();
        let mut engine_added = HashSet::new();
        run(&calendar, &employees, &mut pins, &mut engine_added);

        for ((_, day), code) in pins.iter() {
            if code.is_prd() {
                assert!(!calendar.day(*day).unwrap().is_prd_forbidden);
            }
        }
    }

    #[test]
    fn leaves_operator_pins_untouched() {
        let calendar = CalendarModel::new(2025, 3, &Default::default());
        let employees = vec![employee("e1")];
        let mut pins = ManualPins::new();
        // operator pin that happens to be on a Sunday AND PRD-forbidden:
        // this component must never remove it since it is not in engine_added.
        let sunday = calendar.sundays()[0];
        pins.insert((employees[0].id.clone(), sunday), ShiftCode::prd());
        let mut engine_added = HashSet::new();

        run(&calendar, &employees, &mut pins, &mut engine_added);
        assert!(pins.get(&(employees[0].id.clone(), sunday)).unwrap().is_prd());
    }
}
