//! End-to-end property tests run against the orchestrator and in-memory
//! stores. Generation counts are kept small for test speed; properties
//! checked here are ones construction guarantees regardless of how many
//! generations the memetic loop gets to run (pin preservation, PRD
//! legality, run-length, absence markers) rather than ones that only
//! hold once fitness reaches zero.

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use scheduling_engine::calendar::CalendarModel;
use scheduling_engine::catalogue;
use scheduling_engine::feasibility;
use scheduling_engine::initializer::{self, InitMode};
use scheduling_engine::memetic::Cancellation;
use scheduling_engine::ports::memory::{
    CollectingProgressSink, InMemoryPinStore, InMemoryScheduleStore,
};
use scheduling_engine::{orchestrator, ports};
use shared::{Department, Employee, EmployeeId, Rank, Settings, ShiftCode};

struct NeverCancel;
impl Cancellation for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

struct NoopLogger;
impl ports::Logger for NoopLogger {
    fn info(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn error(&self, _: &str) {}
}

fn full_settings(vx_min: u32) -> Settings {
    let mut selected_shifts: HashSet<ShiftCode> = catalogue::working_codes().into_iter().collect();
    selected_shifts.insert(ShiftCode::prd());
    Settings { vx_min, max_generations: 5, selected_shifts, ..Settings::default() }
}

fn cs_and_cashier_employees(cs_count: usize, cashier_count: usize) -> Vec<Employee> {
    let mut employees = Vec::new();
    for i in 0..cs_count {
        employees.push(Employee {
            id: EmployeeId::new(format!("cs{i}")).unwrap(),
            name: format!("CS {i}"),
            rank: Rank::Junior,
            department: Department::CustomerService,
        });
    }
    for i in 0..cashier_count {
        employees.push(Employee {
            id: EmployeeId::new(format!("cash{i}")).unwrap(),
            name: format!("Cashier {i}"),
            rank: Rank::Junior,
            department: Department::Cashier,
        });
    }
    employees
}

fn run_month(employees: Vec<Employee>, settings: &Settings, seed: u64) -> orchestrator::RunReport {
    let pin_store = InMemoryPinStore::default();
    let schedule_store = InMemoryScheduleStore::default();
    let mut progress = CollectingProgressSink::default();
    let mut engine_added_prd = HashSet::new();

    orchestrator::run(
        2025,
        3,
        employees,
        Default::default(),
        settings,
        &mut engine_added_prd,
        Some(seed),
        &NeverCancel,
        &mut progress,
        &NoopLogger,
        &pin_store,
        &schedule_store,
    )
    .expect("feasible, well-formed run must not error")
}

#[test]
fn p1_prd_count_matches_sundays() {
    let employees = cs_and_cashier_employees(4, 2);
    let settings = full_settings(1);
    let report = run_month(employees.clone(), &settings, 42);
    let calendar = CalendarModel::new(2025, 3, &settings.holidays);

    for employee in &employees {
        let count = (0..calendar.day_count())
            .filter(|&d| report.schedule.get(&employee.id, d).map(|c| c.is_prd()).unwrap_or(false))
            .count();
        assert_eq!(count, calendar.sunday_count(), "employee {} PRD count", employee.id);
    }
}

#[test]
fn p2_pins_are_preserved_verbatim() {
    let employees = cs_and_cashier_employees(4, 1);
    let settings = full_settings(1);
    let pin_store = InMemoryPinStore::default();
    let schedule_store = InMemoryScheduleStore::default();
    let mut progress = CollectingProgressSink::default();
    let mut engine_added_prd = HashSet::new();

    let mut pins = shared::ManualPins::new();
    pins.insert((employees[4].id.clone(), 0), ShiftCode::al());

    let report = orchestrator::run(
        2025,
        3,
        employees.clone(),
        pins,
        &settings,
        &mut engine_added_prd,
        Some(1),
        &NeverCancel,
        &mut progress,
        &NoopLogger,
        &pin_store,
        &schedule_store,
    )
    .unwrap();

    assert_eq!(report.schedule.get(&employees[4].id, 0).map(|c| c.as_str()), Some("AL"));
}

#[test]
fn p4_no_work_run_exceeds_seven_days() {
    let employees = cs_and_cashier_employees(4, 1);
    let settings = full_settings(1);
    let report = run_month(employees.clone(), &settings, 7);
    let calendar = CalendarModel::new(2025, 3, &settings.holidays);

    for employee in &employees {
        let mut run = 0;
        for day in 0..calendar.day_count() {
            let working = report.schedule.get(&employee.id, day).map(|c| !c.is_off_marker()).unwrap_or(false);
            if working {
                run += 1;
                assert!(run <= 7, "employee {} exceeded a 7-day run at day {day}", employee.id);
            } else {
                run = 0;
            }
        }
    }
}

#[test]
fn p7_absence_markers_only_appear_when_pinned() {
    let employees = cs_and_cashier_employees(4, 1);
    let settings = full_settings(1);
    let report = run_month(employees.clone(), &settings, 9);
    let calendar = CalendarModel::new(2025, 3, &settings.holidays);

    for employee in &employees {
        for day in 0..calendar.day_count() {
            if let Some(code) = report.schedule.get(&employee.id, day) {
                assert!(!code.is_absence(), "unpinned absence marker for {} at day {day}", employee.id);
            }
        }
    }
}

#[test]
fn p8_no_prd_on_a_forbidden_day_unless_pinned() {
    let employees = cs_and_cashier_employees(4, 1);
    let settings = full_settings(1);
    let report = run_month(employees.clone(), &settings, 11);
    let calendar = CalendarModel::new(2025, 3, &settings.holidays);

    for employee in &employees {
        for day in 0..calendar.day_count() {
            let is_prd = report.schedule.get(&employee.id, day).map(|c| c.is_prd()).unwrap_or(false);
            if is_prd {
                assert!(!calendar.day(day).unwrap().is_prd_forbidden, "PRD landed on a forbidden day");
            }
        }
    }
}

#[test]
fn p10_schedule_round_trips_through_the_store() {
    let employees = cs_and_cashier_employees(4, 1);
    let settings = full_settings(1);
    let schedule_store = InMemoryScheduleStore::default();
    let pin_store = InMemoryPinStore::default();
    let mut progress = CollectingProgressSink::default();
    let mut engine_added_prd = HashSet::new();

    let report = orchestrator::run(
        2025,
        3,
        employees,
        Default::default(),
        &settings,
        &mut engine_added_prd,
        Some(5),
        &NeverCancel,
        &mut progress,
        &NoopLogger,
        &pin_store,
        &schedule_store,
    )
    .unwrap();

    let calendar = CalendarModel::new(2025, 3, &settings.holidays);
    let reloaded = schedule_store.load_for_month(&calendar).unwrap();
    for employee in reloaded.employee_ids() {
        for day in 0..calendar.day_count() {
            assert_eq!(reloaded.get(employee, day), report.schedule.get(employee, day));
        }
    }
}

#[test]
fn e2_feasibility_rejects_missing_anchor_code() {
    let employees = cs_and_cashier_employees(10, 0);
    let mut selected: HashSet<ShiftCode> = catalogue::working_codes().into_iter().collect();
    selected.remove(&ShiftCode::new("V633").unwrap());
    selected.insert(ShiftCode::prd());

    let err = feasibility::check(&employees, &selected).unwrap_err();
    assert!(err.contains("V633"));
}

#[test]
fn e6_manager_gets_morning_only_or_prd_after_initialization() {
    let manager = Employee {
        id: EmployeeId::new("m1").unwrap(),
        name: "Manager".to_string(),
        rank: Rank::Manager,
        department: Department::Cashier,
    };
    let settings = full_settings(1);
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let schedule = initializer::build_candidate(
        InitMode::Random,
        &[manager.clone()],
        28,
        &Default::default(),
        &settings,
        &mut rng,
    );
    for day in 0..28 {
        let code = schedule.get(&manager.id, day).unwrap();
        assert!(code.is_prd() || catalogue::is_morning(code), "day {day} violates Manager morning-only restriction");
    }
}
