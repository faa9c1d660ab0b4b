use serde::{Deserialize, Serialize};

/// Seniority band. Senior and Manager are restricted to morning shifts at
/// initialization and mutation time (spec Open Question: a hard
/// restriction there, not enforced in fitness).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Junior,
    Senior,
    Manager,
}

impl Rank {
    pub fn morning_only(self) -> bool {
        matches!(self, Rank::Senior | Rank::Manager)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    Cashier,
    CustomerService,
}

/// Shift-code family. `Off` covers PRD/AL/NPL — none of which carry a
/// start/end time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftFamily {
    Vx,
    V8,
    V6,
    Off,
}

impl ShiftFamily {
    /// Shift length in hours, or `None` for the `Off` family.
    pub fn length_hours(self) -> Option<f64> {
        match self {
            ShiftFamily::Vx => Some(10.0),
            ShiftFamily::V8 => Some(8.0),
            ShiftFamily::V6 => Some(6.0),
            ShiftFamily::Off => None,
        }
    }
}

/// Status of a single end-to-end scheduling run, surfaced to the caller
/// through the orchestrator's report (not a store concept).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Completed,
    NoSolution,
    ResidualViolations,
}
