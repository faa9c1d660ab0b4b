//! External interfaces (spec §6): the engine talks to the rest of the
//! application only through these traits. They are plain synchronous
//! functions — see SPEC_FULL.md's External Interfaces section for why
//! that departs from the teacher's `async_trait` repositories.
//!
//! Reference persistent schema (to be honoured bit-exactly for
//! compatibility with existing data):
//!
//! ```sql
//! employees(id TEXT PK, name TEXT, rank TEXT, department TEXT)
//! schedule(emp_id TEXT, date TEXT ISO-8601, shift TEXT, PK(emp_id, date))
//! manual_shifts(emp_id TEXT, date TEXT ISO-8601, shift TEXT, PK(emp_id, date))
//! settings(key TEXT PK, value TEXT)
//! ```
//!
//! Schedule and pin rows are keyed by absolute ISO date on the wire; the
//! day-index within a month is reconstructed via `CalendarModel::index_of`.

pub mod memory;

use shared::{EngineResult, ManualPins, Schedule};

use crate::calendar::CalendarModel;

pub trait EmployeeStore {
    fn list(&self) -> EngineResult<Vec<shared::Employee>>;
    fn save(&self, employees: &[shared::Employee]) -> EngineResult<()>;
}

pub trait PinStore {
    fn load_for_month(&self, calendar: &CalendarModel) -> EngineResult<ManualPins>;
    fn save_for_month(&self, pins: &ManualPins, calendar: &CalendarModel) -> EngineResult<()>;
    fn clear_for_month(&self, calendar: &CalendarModel) -> EngineResult<()>;
}

pub trait ScheduleStore {
    fn load_for_month(&self, calendar: &CalendarModel) -> EngineResult<Schedule>;
    fn save_for_month(&self, schedule: &Schedule, calendar: &CalendarModel) -> EngineResult<()>;
    fn clear_for_month(&self, calendar: &CalendarModel) -> EngineResult<()>;
}

/// Known keys: `"vxMin"`, `"maxGenerations"` (both stored as integers).
pub trait SettingsStore {
    fn get(&self, key: &str, default: &str) -> String;
    fn set(&mut self, key: &str, value: &str);
}

/// Write-only; called from the orchestrating thread only, batched at
/// generation boundaries when the memetic loop parallelises fitness
/// evaluation (spec §5 Shared-resource policy).
pub trait ProgressSink {
    fn report(&mut self, fraction_complete: f64, message: &str);
}

impl ProgressSink for () {
    fn report(&mut self, _fraction_complete: f64, _message: &str) {}
}

pub trait Logger {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to `tracing`, the way the rest of this crate logs.
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
