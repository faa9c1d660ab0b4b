use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Department, Rank};

/// Unique non-empty employee identifier (spec §3: "unique non-empty text").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub rank: Rank,
    pub department: Department,
}

/// A shift-code token: one of the VX/V8/V6 family codes, or a marker
/// (PRD/AL/NPL). This type only guarantees "non-empty, no surrounding
/// whitespace" — structural validity against the catalogue (is `V814` a
/// real code, does `V9xx` exist) is `scheduling_engine::catalogue`'s job,
/// not the data model's.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftCode(String);

impl ShiftCode {
    pub const PRD: &'static str = "PRD";
    pub const AL: &'static str = "AL";
    pub const NPL: &'static str = "NPL";

    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() || token.trim() != token {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn prd() -> Self {
        Self(Self::PRD.to_string())
    }

    pub fn al() -> Self {
        Self(Self::AL.to_string())
    }

    pub fn npl() -> Self {
        Self(Self::NPL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// PRD/AL/NPL: a day the employee is not working, as opposed to a cell
    /// simply being unassigned (`None` in a `Schedule` row).
    pub fn is_off_marker(&self) -> bool {
        matches!(self.0.as_str(), Self::PRD | Self::AL | Self::NPL)
    }

    pub fn is_prd(&self) -> bool {
        self.0 == Self::PRD
    }

    pub fn is_absence(&self) -> bool {
        self.0 == Self::AL || self.0 == Self::NPL
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single calendar day inside the scheduled month (26th of `month`
/// through 25th of the following month), plus the facts the engine needs
/// about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: chrono::NaiveDate,
    /// Mon = 0 .. Sun = 6.
    pub weekday: u8,
    pub is_holiday: bool,
    /// weekday ∈ {Sat, Sun} ∨ is_holiday ∨ day-of-month ∈ {5, 20}.
    pub is_prd_forbidden: bool,
}

impl CalendarDay {
    pub fn is_sunday(&self) -> bool {
        self.weekday == 6
    }
}

/// (employeeId, dayIndex) -> ShiftCode. Authoritative: the engine may never
/// overwrite a pin.
pub type ManualPins = HashMap<(EmployeeId, usize), ShiftCode>;

/// A dense employeeId x dayIndex assignment. `None` means "unassigned"; a
/// completed schedule has no `None` cells.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    rows: HashMap<EmployeeId, Vec<Option<ShiftCode>>>,
    days: usize,
}

impl Schedule {
    pub fn empty(employee_ids: impl IntoIterator<Item = EmployeeId>, days: usize) -> Self {
        let rows = employee_ids
            .into_iter()
            .map(|id| (id, vec![None; days]))
            .collect();
        Self { rows, days }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn employee_ids(&self) -> impl Iterator<Item = &EmployeeId> {
        self.rows.keys()
    }

    pub fn get(&self, employee: &EmployeeId, day: usize) -> Option<&ShiftCode> {
        self.rows.get(employee)?.get(day)?.as_ref()
    }

    pub fn set(&mut self, employee: &EmployeeId, day: usize, shift: Option<ShiftCode>) {
        if let Some(row) = self.rows.get_mut(employee) {
            if day < row.len() {
                row[day] = shift;
            }
        }
    }

    pub fn row(&self, employee: &EmployeeId) -> Option<&[Option<ShiftCode>]> {
        self.rows.get(employee).map(|r| r.as_slice())
    }

    pub fn row_mut(&mut self, employee: &EmployeeId) -> Option<&mut Vec<Option<ShiftCode>>> {
        self.rows.get_mut(employee)
    }

    pub fn is_complete(&self) -> bool {
        self.rows.values().all(|row| row.iter().all(Option::is_some))
    }
}

/// Engine-wide tunables (spec §3 Settings). `selected_shifts` must include
/// PRD and the six CS-anchor codes or the feasibility precheck rejects the
/// run (spec §4.3).
#[derive(Debug, Clone)]
pub struct Settings {
    pub vx_min: u32,
    pub max_generations: u32,
    pub balance_morning_evening: bool,
    pub max_morning_evening_diff: u32,
    pub selected_shifts: HashSet<ShiftCode>,
    /// Fixed holiday dates as (day-of-month, month) pairs. Externalised to
    /// configuration per the spec's Open Question — see DESIGN.md.
    pub holidays: HashSet<(u32, u32)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vx_min: 3,
            max_generations: 200,
            balance_morning_evening: false,
            max_morning_evening_diff: 2,
            selected_shifts: HashSet::new(),
            holidays: HashSet::new(),
        }
    }
}

/// Documents the CSV import contract (spec §6) for the benefit of an
/// external importer. The engine never parses CSV itself — rows with an
/// unknown department or a duplicate ID are the importer's problem to
/// reject, not this crate's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeImportRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Full Name")]
    pub full_name: String,
    #[serde(rename = "Rank")]
    pub rank: Rank,
    #[serde(rename = "Department")]
    pub department: Department,
}
