use rand::Rng;
use rayon::prelude::*;

use shared::{Employee, ManualPins, Schedule, Settings};

use crate::calendar::CalendarModel;
use crate::fitness::{self, FitnessReport};

#[derive(Clone)]
pub struct Candidate {
    pub schedule: Schedule,
    pub fitness: FitnessReport,
}

/// Evaluates fitness for every member in parallel — members are
/// independent, per spec §4.8 step 1 and §5's concurrency model.
pub fn evaluate_all(
    schedules: Vec<Schedule>,
    calendar: &CalendarModel,
    employees: &[Employee],
    pins: &ManualPins,
    settings: &Settings,
) -> Vec<Candidate> {
    schedules
        .into_par_iter()
        .map(|schedule| {
            let report = fitness::evaluate(&schedule, calendar, employees, pins, settings);
            Candidate { schedule, fitness: report }
        })
        .collect()
}

/// Sorts ascending by fitness score (lower is better) and returns the
/// indices of the top `elite_size` candidates.
pub fn elite_indices(population: &[Candidate], elite_size: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..population.len()).collect();
    indices.sort_by_key(|&i| population[i].fitness.score);
    indices.truncate(elite_size);
    indices
}

/// Samples `tournament_size` candidates uniformly at random and returns
/// the index of the one with the lowest fitness score.
pub fn tournament_select(population: &[Candidate], tournament_size: usize, rng: &mut impl Rng) -> usize {
    let mut best = rng.gen_range(0..population.len());
    for _ in 1..tournament_size {
        let challenger = rng.gen_range(0..population.len());
        if population[challenger].fitness.score < population[best].fitness.score {
            best = challenger;
        }
    }
    best
}

pub fn best_index(population: &[Candidate]) -> usize {
    population
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| c.fitness.score)
        .map(|(i, _)| i)
        .expect("population must be non-empty")
}
