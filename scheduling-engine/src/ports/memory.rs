//! In-memory reference implementations of the port traits, used by the
//! demo CLI harness and the property tests. A real deployment swaps
//! these for store types backed by the schema documented in the parent
//! module.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use shared::{EmployeeId, EngineResult, Employee, ManualPins, Schedule, ShiftCode};

use super::{EmployeeStore, PinStore, ProgressSink, ScheduleStore, SettingsStore};
use crate::calendar::CalendarModel;

#[derive(Default)]
pub struct InMemoryEmployeeStore {
    employees: Mutex<Vec<Employee>>,
}

impl InMemoryEmployeeStore {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees: Mutex::new(employees) }
    }
}

impl EmployeeStore for InMemoryEmployeeStore {
    fn list(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.employees.lock().expect("employee store lock poisoned").clone())
    }

    fn save(&self, employees: &[Employee]) -> EngineResult<()> {
        *self.employees.lock().expect("employee store lock poisoned") = employees.to_vec();
        Ok(())
    }
}

/// Keyed by absolute date, matching the wire encoding described in §6 —
/// the day-index within a given month is a `CalendarModel` detail, not
/// something the store itself needs to understand.
#[derive(Default)]
pub struct InMemoryPinStore {
    pins: Mutex<HashMap<(EmployeeId, NaiveDate), ShiftCode>>,
}

impl PinStore for InMemoryPinStore {
    fn load_for_month(&self, calendar: &CalendarModel) -> EngineResult<ManualPins> {
        let store = self.pins.lock().expect("pin store lock poisoned");
        let mut pins = ManualPins::new();
        for ((employee, date), code) in store.iter() {
            if let Some(day) = calendar.index_of(*date) {
                pins.insert((employee.clone(), day), code.clone());
            }
        }
        Ok(pins)
    }

    fn save_for_month(&self, pins: &ManualPins, calendar: &CalendarModel) -> EngineResult<()> {
        let mut store = self.pins.lock().expect("pin store lock poisoned");
        for ((employee, day), code) in pins.iter() {
            if let Some(calendar_day) = calendar.day(*day) {
                store.insert((employee.clone(), calendar_day.date), code.clone());
            }
        }
        Ok(())
    }

    fn clear_for_month(&self, calendar: &CalendarModel) -> EngineResult<()> {
        let dates: Vec<NaiveDate> = calendar.days().iter().map(|d| d.date).collect();
        self.pins.lock().expect("pin store lock poisoned").retain(|(_, date), _| !dates.contains(date));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryScheduleStore {
    cells: Mutex<HashMap<(EmployeeId, NaiveDate), ShiftCode>>,
}

impl ScheduleStore for InMemoryScheduleStore {
    fn load_for_month(&self, calendar: &CalendarModel) -> EngineResult<Schedule> {
        let store = self.cells.lock().expect("schedule store lock poisoned");
        let employee_ids: Vec<EmployeeId> = store
            .keys()
            .filter(|(_, date)| calendar.index_of(*date).is_some())
            .map(|(id, _)| id.clone())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        let mut schedule = Schedule::empty(employee_ids, calendar.day_count());
        for ((employee, date), code) in store.iter() {
            if let Some(day) = calendar.index_of(*date) {
                schedule.set(employee, day, Some(code.clone()));
            }
        }
        Ok(schedule)
    }

    fn save_for_month(&self, schedule: &Schedule, calendar: &CalendarModel) -> EngineResult<()> {
        let mut store = self.cells.lock().expect("schedule store lock poisoned");
        for employee in schedule.employee_ids() {
            for day in 0..schedule.days() {
                if let (Some(code), Some(calendar_day)) = (schedule.get(employee, day), calendar.day(day)) {
                    store.insert((employee.clone(), calendar_day.date), code.clone());
                }
            }
        }
        Ok(())
    }

    fn clear_for_month(&self, calendar: &CalendarModel) -> EngineResult<()> {
        let dates: Vec<NaiveDate> = calendar.days().iter().map(|d| d.date).collect();
        self.cells.lock().expect("schedule store lock poisoned").retain(|(_, date), _| !dates.contains(date));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .lock()
            .expect("settings store lock poisoned")
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.lock().expect("settings store lock poisoned").insert(key.to_string(), value.to_string());
    }
}

/// Collects every progress report, for assertions in tests and for the
/// demo CLI to print a trace at the end of a run.
#[derive(Default)]
pub struct CollectingProgressSink {
    pub events: Vec<(f64, String)>,
}

impl ProgressSink for CollectingProgressSink {
    fn report(&mut self, fraction_complete: f64, message: &str) {
        self.events.push((fraction_complete, message.to_string()));
    }
}
