use rand::Rng;

use shared::{Employee, ManualPins, Schedule};

use crate::initializer;

/// One-point crossover over the day axis (spec §4.8 step 5): a single cut
/// index splits every employee's day-vector identically; pins are
/// reapplied on both children afterwards since a child may have inherited
/// a non-pin value at a pinned position from either parent.
pub fn crossover(
    parent_a: &Schedule,
    parent_b: &Schedule,
    pins: &ManualPins,
    days: usize,
    rng: &mut impl Rng,
) -> (Schedule, Schedule) {
    let cut = rng.gen_range(0..days.max(1));
    let ids: Vec<_> = parent_a.employee_ids().cloned().collect();

    let mut child_a = Schedule::empty(ids.iter().cloned(), days);
    let mut child_b = Schedule::empty(ids.iter().cloned(), days);

    for id in &ids {
        for day in 0..days {
            let (from_a_to_a, from_b_to_a) = if day < cut {
                (parent_a.get(id, day), parent_b.get(id, day))
            } else {
                (parent_b.get(id, day), parent_a.get(id, day))
            };
            child_a.set(id, day, from_a_to_a.cloned());
            child_b.set(id, day, from_b_to_a.cloned());
        }
    }

    reapply_pins(&mut child_a, pins);
    reapply_pins(&mut child_b, pins);
    (child_a, child_b)
}

/// Point mutation (spec §4.8 step 6): every unpinned cell independently
/// has `mutation_rate` probability of being replaced by a fresh draw from
/// the rank-restricted pool.
pub fn mutate(
    schedule: &mut Schedule,
    employees: &[Employee],
    pins: &ManualPins,
    selected_shifts: &shared::Settings,
    mutation_rate: f64,
    rng: &mut impl Rng,
) {
    for employee in employees {
        let pool = initializer::draw_pool(employee.rank, selected_shifts);
        if pool.is_empty() {
            continue;
        }
        let days = schedule.row(&employee.id).map(|r| r.len()).unwrap_or(0);
        for day in 0..days {
            if pins.contains_key(&(employee.id.clone(), day)) {
                continue;
            }
            if rng.gen_bool(mutation_rate) {
                let choice = pool[rng.gen_range(0..pool.len())].clone();
                schedule.set(&employee.id, day, Some(choice));
            }
        }
    }
}

pub fn reapply_pins(schedule: &mut Schedule, pins: &ManualPins) {
    for ((employee, day), code) in pins.iter() {
        schedule.set(employee, *day, Some(code.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use shared::{Department, EmployeeId, Rank, ShiftCode};

    fn employee(id: &str) -> Employee {
        Employee { id: EmployeeId::new(id).unwrap(), name: id.to_string(), rank: Rank::Junior, department: Department::Cashier }
    }

    #[test]
    fn crossover_preserves_pins_on_both_children() {
        let e = employee("e1");
        let days = 10;
        let mut parent_a = Schedule::empty([e.id.clone()], days);
        let mut parent_b = Schedule::empty([e.id.clone()], days);
        let vx = ShiftCode::new("VX14").unwrap();
        let v6 = ShiftCode::new("V614").unwrap();
        for day in 0..days {
            parent_a.set(&e.id, day, Some(vx.clone()));
            parent_b.set(&e.id, day, Some(v6.clone()));
        }
        let mut pins = ManualPins::new();
        pins.insert((e.id.clone(), 3), ShiftCode::al());

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let (child_a, child_b) = crossover(&parent_a, &parent_b, &pins, days, &mut rng);
        assert_eq!(child_a.get(&e.id, 3).map(|c| c.as_str()), Some("AL"));
        assert_eq!(child_b.get(&e.id, 3).map(|c| c.as_str()), Some("AL"));
    }

    #[test]
    fn mutation_never_touches_pinned_cells() {
        let e = employee("e1");
        let days = 20;
        let mut schedule = Schedule::empty([e.id.clone()], days);
        let vx = ShiftCode::new("VX14").unwrap();
        for day in 0..days {
            schedule.set(&e.id, day, Some(vx.clone()));
        }
        let mut pins = ManualPins::new();
        pins.insert((e.id.clone(), 5), vx.clone());
        schedule.set(&e.id, 5, Some(vx.clone()));

        let settings = shared::Settings {
            selected_shifts: [ShiftCode::new("V614").unwrap(), vx.clone()].into_iter().collect(),
            ..shared::Settings::default()
        };
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        mutate(&mut schedule, std::slice::from_ref(&e), &pins, &settings, 1.0, &mut rng);
        assert_eq!(schedule.get(&e.id, 5).map(|c| c.as_str()), Some("VX14"));
    }
}
