//! FeasibilityChecker (spec §4.3): a structural precondition over
//! (employees, selected shifts), evaluated once before the orchestrator
//! does any real work. Never panics, never returns a typed error — a
//! single human-readable reason string is the whole contract.

use std::collections::HashSet;

use shared::{Department, Employee, ShiftCode};

use crate::catalogue::{self, ANCHOR_CODES};

const MIN_CS_HEADCOUNT: usize = 4;

/// Returns `Ok(())` if the run is feasible, or `Err(reason)` with a single
/// English sentence naming the first violated precondition.
pub fn check(employees: &[Employee], selected_shifts: &HashSet<ShiftCode>) -> Result<(), String> {
    let cs_count = employees
        .iter()
        .filter(|e| e.department == Department::CustomerService)
        .count();

    if cs_count > 0 && cs_count < MIN_CS_HEADCOUNT {
        return Err(format!(
            "Customer Service department is in scope but has only {cs_count} employees; at least {MIN_CS_HEADCOUNT} are required"
        ));
    }

    let missing_anchors: Vec<&str> = ANCHOR_CODES
        .iter()
        .filter(|code| !selected_shifts.iter().any(|s| s.as_str() == **code))
        .copied()
        .collect();
    if !missing_anchors.is_empty() {
        return Err(format!(
            "selected shifts are missing required anchor codes: {}",
            missing_anchors.join(", ")
        ));
    }

    let has_morning = selected_shifts.iter().any(catalogue::is_morning);
    let has_evening = selected_shifts.iter().any(catalogue::is_evening);
    if !has_morning || !has_evening {
        return Err(
            "selected shifts must include at least one morning (start < 12) and one evening (start >= 12) shift"
                .to_string(),
        );
    }

    if !selected_shifts.iter().any(|s| s.is_prd()) {
        return Err("selected shifts must include PRD".to_string());
    }

    Ok(())
}
