//! The memetic loop itself (spec §4.8): selection, crossover, mutation,
//! and local repair, generation after generation, until the best schedule
//! is clean enough or `max_generations` runs out.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use shared::{Employee, ManualPins, Schedule, Settings};

use crate::calendar::CalendarModel;
use crate::fitness;
use crate::initializer;
use crate::memetic::population::{self, Candidate};
use crate::memetic::{operators, repair, Cancellation, Progress};

#[derive(Debug, Clone)]
pub struct MemeticConfig {
    pub population: usize,
    pub elite_size: usize,
    pub tournament_size: usize,
    pub mutation_rate: f64,
    pub local_repair_max_steps: usize,
    pub max_generations: u32,
}

impl MemeticConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self { max_generations: settings.max_generations, ..Self::default() }
    }
}

impl Default for MemeticConfig {
    fn default() -> Self {
        Self {
            population: 50,
            elite_size: 5,
            tournament_size: 5,
            mutation_rate: 0.01,
            local_repair_max_steps: 300,
            max_generations: 200,
        }
    }
}

pub struct MemeticOutcome {
    pub best_schedule: Schedule,
    pub best_fitness: fitness::FitnessReport,
    pub generations_run: u32,
}

pub fn run(
    calendar: &CalendarModel,
    employees: &[Employee],
    pins: &ManualPins,
    settings: &Settings,
    config: &MemeticConfig,
    seed: Option<u64>,
    cancellation: &dyn Cancellation,
    progress: &mut dyn Progress,
) -> MemeticOutcome {
    let mut master_rng = match seed {
        Some(s) => ChaCha20Rng::seed_from_u64(s),
        None => ChaCha20Rng::from_entropy(),
    };

    let days = calendar.day_count();
    let modes = initializer::modes_for_population(config.population);
    let initial_schedules: Vec<Schedule> = modes
        .into_iter()
        .map(|mode| {
            let mut worker_rng = ChaCha20Rng::seed_from_u64(master_rng.gen());
            initializer::build_candidate(mode, employees, days, pins, settings, &mut worker_rng)
        })
        .collect();

    let mut population_vec = population::evaluate_all(initial_schedules, calendar, employees, pins, settings);
    let mut best: Candidate = population_vec[population::best_index(&population_vec)].clone();
    let mut generations_run = 0u32;

    for generation in 0..config.max_generations {
        if cancellation.is_cancelled() {
            break;
        }

        let current_best = &population_vec[population::best_index(&population_vec)];
        if current_best.fitness.score < best.fitness.score {
            best = current_best.clone();
        }

        progress.report(
            generation as f64 / config.max_generations.max(1) as f64,
            &format!("generation {generation}: best fitness {}", best.fitness.score),
        );

        if best.fitness.is_clean() {
            break;
        }
        generations_run = generation + 1;

        let elite = population::elite_indices(&population_vec, config.elite_size);
        let mut next_schedules: Vec<Schedule> =
            elite.iter().map(|&i| population_vec[i].schedule.clone()).collect();

        while next_schedules.len() < config.population {
            if cancellation.is_cancelled() {
                break;
            }
            let parent_a = population::tournament_select(&population_vec, config.tournament_size, &mut master_rng);
            let parent_b = population::tournament_select(&population_vec, config.tournament_size, &mut master_rng);

            let (mut child_a, mut child_b) = operators::crossover(
                &population_vec[parent_a].schedule,
                &population_vec[parent_b].schedule,
                pins,
                days,
                &mut master_rng,
            );
            operators::mutate(&mut child_a, employees, pins, settings, config.mutation_rate, &mut master_rng);
            operators::mutate(&mut child_b, employees, pins, settings, config.mutation_rate, &mut master_rng);

            let mut rng_a = ChaCha20Rng::seed_from_u64(master_rng.gen());
            repair::run(
                &mut child_a,
                calendar,
                employees,
                pins,
                settings,
                config.local_repair_max_steps,
                cancellation,
                &mut rng_a,
            );
            next_schedules.push(child_a);

            if next_schedules.len() < config.population {
                let mut rng_b = ChaCha20Rng::seed_from_u64(master_rng.gen());
                repair::run(
                    &mut child_b,
                    calendar,
                    employees,
                    pins,
                    settings,
                    config.local_repair_max_steps,
                    cancellation,
                    &mut rng_b,
                );
                next_schedules.push(child_b);
            }
        }
        next_schedules.truncate(config.population);

        population_vec = population::evaluate_all(next_schedules, calendar, employees, pins, settings);
    }

    let final_best = &population_vec[population::best_index(&population_vec)];
    if final_best.fitness.score < best.fitness.score {
        best = final_best.clone();
    }

    let mut final_rng = ChaCha20Rng::seed_from_u64(master_rng.gen());
    let final_report = repair::run(
        &mut best.schedule,
        calendar,
        employees,
        pins,
        settings,
        config.local_repair_max_steps,
        cancellation,
        &mut final_rng,
    );
    best.fitness = final_report;

    MemeticOutcome { best_schedule: best.schedule, best_fitness: best.fitness, generations_run }
}
