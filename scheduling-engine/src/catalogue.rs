//! ShiftCatalogue (spec §4.1): enumerates valid shift codes and derives
//! start/end times. Every lookup here is a pure function over a
//! [`ShiftCode`] — no shared mutable state, so nothing needs locking and
//! nothing needs a constructor.

use std::sync::OnceLock;

use shared::{ShiftCode, ShiftFamily};

/// The six CS-anchor codes whose daily coverage FixedAssigner mandates.
pub const ANCHOR_CODES: [&str; 6] = ["V814", "V614", "V818", "V618", "V829", "V633"];

/// Which anchor slot a code fills, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSlot {
    /// One of {V814, V614} — the opening slot.
    Open14,
    /// One of {V818, V618} — the mid slot.
    Mid18,
    /// Two of {V829, V633}, at most one V633 — the closing slot.
    Close2933,
}

pub fn anchor_slot(code: &str) -> Option<AnchorSlot> {
    match code {
        "V814" | "V614" => Some(AnchorSlot::Open14),
        "V818" | "V618" => Some(AnchorSlot::Mid18),
        "V829" | "V633" => Some(AnchorSlot::Close2933),
        _ => None,
    }
}

/// Parses a VX/V8/V6 code into (family, numeric suffix). Returns `None`
/// for markers, empty strings, or anything outside the valid suffix range
/// for its family.
fn parse(code: &str) -> Option<(ShiftFamily, u32)> {
    let (rest, family, (lo, hi)) = if let Some(rest) = code.strip_prefix("VX") {
        (rest, ShiftFamily::Vx, (14, 25))
    } else if let Some(rest) = code.strip_prefix("V8") {
        (rest, ShiftFamily::V8, (14, 29))
    } else if let Some(rest) = code.strip_prefix("V6") {
        (rest, ShiftFamily::V6, (14, 33))
    } else {
        return None;
    };

    if rest.len() != 2 {
        return None;
    }
    let hh: u32 = rest.parse().ok()?;
    if hh < lo || hh > hi {
        return None;
    }
    Some((family, hh))
}

/// `family(code)` ∈ {VX, V8, V6, off}; `None` for anything not in the
/// catalogue (including an empty/unassigned cell).
pub fn family(code: &ShiftCode) -> Option<ShiftFamily> {
    if code.is_off_marker() {
        return Some(ShiftFamily::Off);
    }
    parse(code.as_str()).map(|(family, _)| family)
}

/// `startHour(code)`: numeric suffix / 2, or `None` for PRD/AL/NPL/empty.
pub fn start_hour(code: &ShiftCode) -> Option<f64> {
    parse(code.as_str()).map(|(_, hh)| hh as f64 / 2.0)
}

/// `endHour(code)`: start + family length ({10, 8, 6} hours). May exceed
/// 24 — callers reasoning about gaps must treat that as wrapping past
/// midnight, never as an error.
pub fn end_hour(code: &ShiftCode) -> Option<f64> {
    let (family, hh) = parse(code.as_str())?;
    let start = hh as f64 / 2.0;
    family.length_hours().map(|len| start + len)
}

pub fn is_morning(code: &ShiftCode) -> bool {
    start_hour(code).map(|h| h < 12.0).unwrap_or(false)
}

pub fn is_evening(code: &ShiftCode) -> bool {
    start_hour(code).map(|h| h >= 12.0).unwrap_or(false)
}

pub fn is_valid(code: &ShiftCode) -> bool {
    code.is_off_marker() || parse(code.as_str()).is_some()
}

fn build_catalogue() -> Vec<ShiftCode> {
    let mut codes = Vec::new();
    for hh in 14..=25 {
        codes.push(ShiftCode::new(format!("VX{hh:02}")).unwrap());
    }
    for hh in 14..=29 {
        codes.push(ShiftCode::new(format!("V8{hh:02}")).unwrap());
    }
    for hh in 14..=33 {
        codes.push(ShiftCode::new(format!("V6{hh:02}")).unwrap());
    }
    codes.push(ShiftCode::prd());
    codes.push(ShiftCode::al());
    codes.push(ShiftCode::npl());
    codes
}

static CATALOGUE: OnceLock<Vec<ShiftCode>> = OnceLock::new();

/// `enumerate()`: the ordered sequence of all valid VX/V8/V6 codes plus
/// {PRD, AL, NPL}. Built once, memoised for the life of the process.
pub fn enumerate() -> &'static [ShiftCode] {
    CATALOGUE.get_or_init(build_catalogue)
}

/// The subset of `enumerate()` that is neither a marker nor an absence —
/// i.e. a real worked shift. Used by the initializer and the memetic
/// operators as their draw pool.
pub fn working_codes() -> Vec<ShiftCode> {
    enumerate()
        .iter()
        .filter(|c| !c.is_off_marker())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vx14_boundaries() {
        let code = ShiftCode::new("VX14").unwrap();
        assert_eq!(start_hour(&code), Some(7.0));
        assert_eq!(end_hour(&code), Some(17.0));
    }

    #[test]
    fn v633_boundaries() {
        let code = ShiftCode::new("V633").unwrap();
        assert_eq!(start_hour(&code), Some(16.5));
        assert_eq!(end_hour(&code), Some(22.5));
    }

    #[test]
    fn prd_has_no_hours() {
        let prd = ShiftCode::prd();
        assert_eq!(start_hour(&prd), None);
        assert_eq!(end_hour(&prd), None);
        assert_eq!(family(&prd), Some(ShiftFamily::Off));
    }

    #[test]
    fn enumerate_counts_match_spec_ranges() {
        let all = enumerate();
        let vx = all.iter().filter(|c| c.as_str().starts_with("VX")).count();
        let v8 = all.iter().filter(|c| c.as_str().starts_with("V8")).count();
        let v6 = all.iter().filter(|c| c.as_str().starts_with("V6")).count();
        assert_eq!(vx, 12);
        assert_eq!(v8, 16);
        assert_eq!(v6, 20);
    }

    #[test]
    fn anchor_slots_resolve() {
        assert_eq!(anchor_slot("V814"), Some(AnchorSlot::Open14));
        assert_eq!(anchor_slot("V614"), Some(AnchorSlot::Open14));
        assert_eq!(anchor_slot("V818"), Some(AnchorSlot::Mid18));
        assert_eq!(anchor_slot("V829"), Some(AnchorSlot::Close2933));
        assert_eq!(anchor_slot("V633"), Some(AnchorSlot::Close2933));
        assert_eq!(anchor_slot("VX14"), None);
    }
}
