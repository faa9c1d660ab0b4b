//! Synthetic employee roster generation for the demo harness, in the
//! style of the `SolverForge` quickstart's `demo_data.rs`: a seeded RNG,
//! a name-permutation pool, and a handful of size presets rather than a
//! file or an interactive prompt.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use shared::{Department, Employee, EmployeeId, Rank};

const FIRST_NAMES: &[&str] =
    &["Amy", "Beth", "Carl", "Dan", "Elsa", "Flo", "Gus", "Hugo", "Ivy", "Jay"];
const LAST_NAMES: &[&str] =
    &["Cole", "Fox", "Green", "Jones", "King", "Li", "Poe", "Rye", "Smith", "Watt"];

#[derive(Debug, Clone, Copy)]
pub enum DemoSize {
    Small,
    Large,
}

impl DemoSize {
    fn parameters(self) -> (usize, usize) {
        // (customer service headcount, cashier headcount)
        match self {
            DemoSize::Small => (6, 3),
            DemoSize::Large => (14, 6),
        }
    }
}

/// Builds a synthetic roster: mostly Junior, a couple of Senior and one
/// Manager per department, so the Manager/Senior morning-only
/// restriction is actually exercised by the demo run.
pub fn generate(size: DemoSize, seed: u64) -> Vec<Employee> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let (cs_count, cashier_count) = size.parameters();

    let mut names = name_permutations();
    names.shuffle(&mut rng);
    let mut names = names.into_iter();

    let mut employees = Vec::with_capacity(cs_count + cashier_count);
    employees.extend(department_roster(Department::CustomerService, cs_count, &mut names));
    employees.extend(department_roster(Department::Cashier, cashier_count, &mut names));
    employees
}

fn department_roster(
    department: Department,
    count: usize,
    names: &mut impl Iterator<Item = String>,
) -> Vec<Employee> {
    (0..count)
        .map(|i| {
            let rank = match i {
                0 => Rank::Manager,
                1 | 2 => Rank::Senior,
                _ => Rank::Junior,
            };
            let name = names.next().unwrap_or_else(|| format!("Employee {i}"));
            let prefix = match department {
                Department::CustomerService => "cs",
                Department::Cashier => "cash",
            };
            Employee {
                id: EmployeeId::new(format!("{prefix}{i}")).expect("generated id is well-formed"),
                name,
                rank,
                department,
            }
        })
        .collect()
}

fn name_permutations() -> Vec<String> {
    let mut names = Vec::with_capacity(FIRST_NAMES.len() * LAST_NAMES.len());
    for first in FIRST_NAMES {
        for last in LAST_NAMES {
            names.push(format!("{first} {last}"));
        }
    }
    names
}
