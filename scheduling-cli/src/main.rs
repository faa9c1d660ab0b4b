mod config;
mod demo_data;

use std::collections::HashSet;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::RunSettings;
use scheduling_engine::ports::memory::{
    CollectingProgressSink, InMemoryPinStore, InMemoryScheduleStore,
};
use scheduling_engine::ports::TracingLogger;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scheduling_cli=info,scheduling_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting scheduling-cli demo run");

    let run_settings = RunSettings::load()?;
    let engine_settings = run_settings.engine_settings()?;
    tracing::info!(
        year = run_settings.year,
        month = run_settings.month,
        seed = run_settings.seed,
        "configuration loaded"
    );

    let employees = demo_data::generate(demo_data::DemoSize::Small, run_settings.seed);
    tracing::info!(headcount = employees.len(), "generated synthetic roster");

    let pin_store = InMemoryPinStore::default();
    let schedule_store = InMemoryScheduleStore::default();
    let logger = TracingLogger;
    let mut progress = CollectingProgressSink::default();
    let mut engine_added_prd = HashSet::new();

    let report = scheduling_engine::run(
        run_settings.year,
        run_settings.month,
        employees,
        Default::default(),
        &engine_settings,
        &mut engine_added_prd,
        Some(run_settings.seed),
        &(),
        &mut progress,
        &logger,
        &pin_store,
        &schedule_store,
    )?;

    println!("run {}: {:?}", report.run_id, report.status);
    println!("generations run: {}", report.generations_run);
    println!("fitness score: {}", report.fitness.score);
    if report.fitness.violations.is_empty() {
        println!("no outstanding violations");
    } else {
        println!("{} violation(s):", report.fitness.violations.len());
        for violation in &report.fitness.violations {
            println!("  - {violation}");
        }
    }
    if !report.ignored_pins.is_empty() {
        println!("{} pin(s) ignored on intake:", report.ignored_pins.len());
        for ((employee, day), reason) in &report.ignored_pins {
            println!("  - {employee} day {day}: {reason}");
        }
    }

    Ok(())
}
