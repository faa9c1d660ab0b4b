//! Orchestrator (spec §4.9): sequences FeasibilityChecker → FixedAssigner
//! → PRDDistributor → population initialisation → the memetic loop →
//! final repair → persistence → a final fitness report.
//!
//! Only a failed precondition or a storage fault ever becomes an `Err`;
//! everything else domain-level (no solution, residual violations,
//! ignored pins) is reported as data on [`RunReport`], per the
//! propagation policy in spec §7.

use std::collections::HashSet;

use shared::{EmployeeId, EngineError, EngineResult, Employee, ManualPins, Schedule, Settings};

use crate::calendar::CalendarModel;
use crate::catalogue;
use crate::feasibility;
use crate::fitness::FitnessReport;
use crate::fixed_assigner;
use crate::memetic::{self, Cancellation, MemeticConfig};
use crate::ports::{Logger, PinStore, ProgressSink, ScheduleStore};
use crate::prd_distributor;

pub struct RunReport {
    /// Identifies this run for correlation in logs and progress events —
    /// a scheduling run has no other natural stable key.
    pub run_id: uuid::Uuid,
    pub status: shared::RunStatus,
    pub schedule: Schedule,
    pub fitness: FitnessReport,
    pub generations_run: u32,
    pub fixed_assigner_message: String,
    pub prd_distributor_message: String,
    /// Pins dropped before the run because they named an unknown shift
    /// code or an employee outside the supplied roster (spec §7
    /// PinConflict) — logged, not raised.
    pub ignored_pins: Vec<((EmployeeId, usize), String)>,
}

pub type RunOutcome = EngineResult<RunReport>;

#[allow(clippy::too_many_arguments)]
pub fn run(
    year: i32,
    month: u32,
    employees: Vec<Employee>,
    mut pins: ManualPins,
    settings: &Settings,
    engine_added_prd: &mut HashSet<(EmployeeId, usize)>,
    seed: Option<u64>,
    cancellation: &dyn Cancellation,
    progress: &mut dyn ProgressSink,
    logger: &dyn Logger,
    pin_store: &dyn PinStore,
    schedule_store: &dyn ScheduleStore,
) -> RunOutcome {
    let run_id = uuid::Uuid::new_v4();
    let calendar = CalendarModel::new(year, month, &settings.holidays);

    let ignored_pins = drop_conflicting_pins(&mut pins, &employees, logger);

    feasibility::check(&employees, &settings.selected_shifts).map_err(EngineError::PreconditionFailure)?;

    let fixed_report = fixed_assigner::run(&calendar, &employees, &mut pins);
    logger.info(&fixed_report.message);

    let prd_report = prd_distributor::run(&calendar, &employees, &mut pins, engine_added_prd);
    logger.info(&prd_report.message);

    let config = MemeticConfig::from_settings(settings);
    let outcome = memetic::run(&calendar, &employees, &pins, settings, &config, seed, cancellation, progress);

    let status = if !outcome.best_schedule.is_complete() {
        logger.warn("memetic loop produced no complete schedule within the generation budget");
        shared::RunStatus::NoSolution
    } else if outcome.best_fitness.score > 0 {
        logger.warn(&format!(
            "run completed with residual violations: score {} ({} violation(s))",
            outcome.best_fitness.score,
            outcome.best_fitness.violations.len()
        ));
        shared::RunStatus::ResidualViolations
    } else {
        shared::RunStatus::Completed
    };

    pin_store.save_for_month(&pins, &calendar)?;
    schedule_store.save_for_month(&outcome.best_schedule, &calendar)?;

    Ok(RunReport {
        run_id,
        status,
        schedule: outcome.best_schedule,
        fitness: outcome.best_fitness,
        generations_run: outcome.generations_run,
        fixed_assigner_message: fixed_report.message,
        prd_distributor_message: prd_report.message,
        ignored_pins,
    })
}

fn drop_conflicting_pins(
    pins: &mut ManualPins,
    employees: &[Employee],
    logger: &dyn Logger,
) -> Vec<((EmployeeId, usize), String)> {
    let known_ids: HashSet<&EmployeeId> = employees.iter().map(|e| &e.id).collect();
    let mut dropped = Vec::new();

    let offenders: Vec<(EmployeeId, usize)> = pins
        .iter()
        .filter_map(|((employee, day), code)| {
            if !known_ids.contains(employee) {
                Some((employee.clone(), *day))
            } else if !catalogue::is_valid(code) {
                Some((employee.clone(), *day))
            } else {
                None
            }
        })
        .collect();

    for key in offenders {
        if let Some(code) = pins.remove(&key) {
            let reason = if !known_ids.contains(&key.0) {
                format!("pin references unknown employee {}", key.0)
            } else {
                format!("pin references unknown shift code {code}")
            };
            logger.warn(&format!("ignoring pin at day {}: {reason}", key.1));
            dropped.push((key, reason));
        }
    }

    dropped
}
